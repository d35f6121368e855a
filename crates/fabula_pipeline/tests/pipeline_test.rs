//! End-to-end pipeline tests over a scripted driver and in-memory store.

use async_trait::async_trait;
use fabula_core::{AssetId, ModelResponse, PromptPart, StoryBrief, StoryBriefBuilder};
use fabula_error::{DriverError, FabulaErrorKind, FabulaResult, PipelineErrorKind};
use fabula_interface::GenerativeDriver;
use fabula_pipeline::{Pipeline, PipelineConfig, RunState};
use fabula_store::{AssetStore, MemoryStore};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// One scripted reply to a multimodal call.
#[derive(Clone)]
enum ImageReply {
    Bytes(Vec<u8>),
    Empty,
    Fail,
}

type CancelPlan = Arc<Mutex<Option<(usize, CancellationToken)>>>;

/// Driver that replays scripted responses and records every multimodal
/// prompt it receives.
struct ScriptedDriver {
    texts: Mutex<VecDeque<String>>,
    images: Mutex<VecDeque<ImageReply>>,
    calls: Arc<Mutex<Vec<Vec<PromptPart>>>>,
    cancel_plan: CancelPlan,
}

impl ScriptedDriver {
    fn new(texts: Vec<String>, images: Vec<ImageReply>) -> Self {
        Self {
            texts: Mutex::new(texts.into_iter().collect()),
            images: Mutex::new(images.into_iter().collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
            cancel_plan: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared handle to the recorded multimodal prompts.
    fn recorded_calls(&self) -> Arc<Mutex<Vec<Vec<PromptPart>>>> {
        Arc::clone(&self.calls)
    }

    /// Handle for arming cancellation after the driver has moved into a
    /// pipeline: set `(count, token)` to fire the token once `count`
    /// multimodal calls have completed.
    fn cancel_plan(&self) -> CancelPlan {
        Arc::clone(&self.cancel_plan)
    }
}

#[async_trait]
impl GenerativeDriver for ScriptedDriver {
    async fn generate_text(&self, _prompt: &str) -> FabulaResult<String> {
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DriverError::new("no scripted text response").into())
    }

    async fn generate_multimodal(&self, parts: &[PromptPart]) -> FabulaResult<ModelResponse> {
        let completed = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(parts.to_vec());
            calls.len()
        };
        if let Some((count, token)) = self.cancel_plan.lock().unwrap().as_ref() {
            if completed >= *count {
                token.cancel();
            }
        }
        let reply = self
            .images
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ImageReply::Bytes(vec![0xAB]));
        match reply {
            ImageReply::Bytes(data) => Ok(ModelResponse::from_image(data)),
            ImageReply::Empty => Ok(ModelResponse::from_text("nothing to show")),
            ImageReply::Fail => Err(DriverError::new("scripted failure").into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-test-model"
    }
}

fn brief() -> StoryBrief {
    StoryBriefBuilder::default()
        .topic("The Discovery of Fire")
        .description("A curious cave dweller discovers fire by accident.")
        .style("cave painting")
        .build()
        .unwrap()
}

fn story_json(characters: &[&str], backgrounds: usize) -> String {
    let cast: Vec<String> = characters
        .iter()
        .map(|name| {
            format!(r#"{{"name": "{name}", "traits": "curious", "appearance": "fur cloak"}}"#)
        })
        .collect();
    let plates: Vec<String> = (0..backgrounds)
        .map(|i| format!(r#""A quiet location number {i}.""#))
        .collect();
    format!(
        r#"Here is your story. {{"storyline": "Kael strikes two stones together.", "character_descriptions": [{}], "background_descriptions": [{}]}}"#,
        cast.join(", "),
        plates.join(", ")
    )
}

fn scenes_json(count: usize) -> String {
    let scenes: Vec<String> = (0..count)
        .map(|i| format!(r#""Scene {}: something happens.""#, i + 1))
        .collect();
    format!(r#"{{"scenes": [{}]}}"#, scenes.join(", "))
}

fn script_json(count: usize) -> String {
    let entries: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"scene": {}, "narration": "The fire crackles.", "dialogue": "Look!"}}"#,
                i + 1
            )
        })
        .collect();
    format!(r#"{{"script": [{}]}}"#, entries.join(", "))
}

fn audio_json() -> String {
    r#"{"audio_description": "Low drums under crackling embers."}"#.to_string()
}

fn test_config() -> PipelineConfig {
    PipelineConfig::default().with_item_delay_ms(0)
}

fn pipeline_with(driver: ScriptedDriver) -> Pipeline<ScriptedDriver> {
    Pipeline::new(driver, Arc::new(MemoryStore::new()), test_config())
}

#[tokio::test]
async fn full_run_walks_the_state_ladder() {
    let scene_count = 3;
    let texts = vec![
        story_json(&["Kael", "Lyra"], 2),
        scenes_json(scene_count),
        script_json(scene_count),
        audio_json(),
        audio_json(),
        audio_json(),
    ];
    let driver = ScriptedDriver::new(texts, Vec::new());
    let store = Arc::new(MemoryStore::new());
    let mut pipeline = Pipeline::new(
        driver,
        store.clone() as Arc<dyn AssetStore>,
        test_config().with_scene_count(scene_count),
    );

    assert_eq!(pipeline.state(), RunState::Empty);
    pipeline.generate_story(&brief()).await.unwrap();
    assert_eq!(pipeline.state(), RunState::StoryReady);

    let characters = pipeline.generate_character_images().await.unwrap();
    assert_eq!(characters.produced, 2);
    assert_eq!(pipeline.state(), RunState::CharactersReady);

    let backgrounds = pipeline.generate_background_images().await.unwrap();
    assert_eq!(backgrounds.produced, 2);
    assert_eq!(pipeline.state(), RunState::BackgroundsReady);

    let scenes = pipeline.generate_scene_descriptions().await.unwrap();
    assert_eq!(scenes.len(), scene_count);
    assert_eq!(pipeline.state(), RunState::ScenesReady);

    let composites = pipeline.generate_scene_composites().await.unwrap();
    assert_eq!(composites.produced, scene_count);
    assert_eq!(pipeline.state(), RunState::CompositesReady);

    let script = pipeline.generate_script().await.unwrap();
    assert_eq!(script.len(), scene_count);
    assert_eq!(pipeline.state(), RunState::ScriptReady);

    let audio = pipeline.generate_audio_descriptions().await.unwrap();
    assert_eq!(audio.produced, scene_count);
    assert_eq!(pipeline.state(), RunState::AudioReady);

    let stored = store.list("").await.unwrap();
    assert!(stored.contains(&"char_kael".to_string()));
    assert!(stored.contains(&"char_lyra".to_string()));
    assert!(stored.contains(&"bg_0".to_string()));
    assert!(stored.contains(&"scene_2".to_string()));
}

#[tokio::test]
async fn story_without_storyline_leaves_state_unchanged() {
    let driver = ScriptedDriver::new(
        vec![r#"{"character_descriptions": [], "background_descriptions": []}"#.to_string()],
        Vec::new(),
    );
    let mut pipeline = pipeline_with(driver);

    let error = pipeline.generate_story(&brief()).await.unwrap_err();
    assert!(matches!(error.kind(), FabulaErrorKind::Contract(_)));
    assert_eq!(pipeline.state(), RunState::Empty);
}

#[tokio::test]
async fn stage_out_of_order_is_rejected() {
    let driver = ScriptedDriver::new(Vec::new(), Vec::new());
    let mut pipeline = pipeline_with(driver);

    let error = pipeline.generate_scene_descriptions().await.unwrap_err();
    let FabulaErrorKind::Pipeline(pipeline_error) = error.kind() else {
        panic!("expected pipeline error, got {error}");
    };
    assert!(matches!(
        pipeline_error.kind,
        PipelineErrorKind::StageNotReady { .. }
    ));
}

#[tokio::test]
async fn background_item_failure_is_isolated() {
    let texts = vec![story_json(&[], 5)];
    let images = vec![
        ImageReply::Bytes(vec![0]),
        ImageReply::Bytes(vec![1]),
        ImageReply::Fail,
        ImageReply::Bytes(vec![3]),
        ImageReply::Bytes(vec![4]),
    ];
    let driver = ScriptedDriver::new(texts, images);
    let store = Arc::new(MemoryStore::new());
    let mut pipeline = Pipeline::new(driver, store.clone() as Arc<dyn AssetStore>, test_config());

    pipeline.generate_story(&brief()).await.unwrap();
    pipeline.generate_character_images().await.unwrap();
    let report = pipeline.generate_background_images().await.unwrap();

    assert_eq!(report.produced, 4);
    assert_eq!(report.failed, 1);
    assert!(report.is_partial());

    // The failed item leaves a hole at its own index.
    let indices: Vec<usize> = pipeline.backgrounds().iter().map(|b| b.index).collect();
    assert_eq!(indices, vec![0, 1, 3, 4]);
    assert_eq!(store.list("bg_").await.unwrap().len(), 4);
}

#[tokio::test]
async fn no_image_data_counts_as_a_failed_item() {
    let texts = vec![story_json(&["Kael", "Lyra"], 0)];
    let images = vec![ImageReply::Empty, ImageReply::Bytes(vec![1])];
    let driver = ScriptedDriver::new(texts, images);
    let mut pipeline = pipeline_with(driver);

    pipeline.generate_story(&brief()).await.unwrap();
    let report = pipeline.generate_character_images().await.unwrap();

    assert_eq!(report.produced, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(pipeline.characters().len(), 1);
    assert_eq!(pipeline.characters()[0].owner, "Lyra");
}

#[tokio::test]
async fn composite_prompts_order_parts_and_wrap_backgrounds() {
    let scene_count = 9;
    let background_count = 5;
    let character_count = 2;
    let texts = vec![
        story_json(&["Kael", "Lyra"], background_count),
        scenes_json(scene_count),
    ];
    // Distinct bytes per background so the wraparound choice is visible.
    let mut images: Vec<ImageReply> = Vec::new();
    for i in 0..character_count {
        images.push(ImageReply::Bytes(vec![0xC0, i as u8]));
    }
    for i in 0..background_count {
        images.push(ImageReply::Bytes(vec![0xB0, i as u8]));
    }
    let driver = ScriptedDriver::new(texts, images);
    let calls = driver.recorded_calls();
    let mut pipeline = pipeline_with(driver);

    pipeline.generate_story(&brief()).await.unwrap();
    pipeline.generate_character_images().await.unwrap();
    pipeline.generate_background_images().await.unwrap();
    pipeline.generate_scene_descriptions().await.unwrap();
    let report = pipeline.generate_scene_composites().await.unwrap();
    assert_eq!(report.produced, scene_count);

    let calls = calls.lock().unwrap();
    let composite_calls = &calls[character_count + background_count..];
    assert_eq!(composite_calls.len(), scene_count);

    for parts in composite_calls {
        // Fixed part layout: text, text, background image, text, then one
        // image per character.
        assert_eq!(parts.len(), 4 + character_count);
        assert!(!parts[0].is_image());
        assert!(!parts[1].is_image());
        assert!(parts[2].is_image());
        assert!(!parts[3].is_image());
        assert!(parts[4..].iter().all(PromptPart::is_image));
    }

    // Scene 6 wraps onto background 6 mod 5 = 1.
    let PromptPart::Image { data, .. } = &composite_calls[6][2] else {
        panic!("expected background image part");
    };
    assert_eq!(data, &vec![0xB0, 1]);
}

#[tokio::test]
async fn composites_skip_when_no_backgrounds_exist() {
    let scene_count = 2;
    let texts = vec![story_json(&["Kael"], 0), scenes_json(scene_count)];
    let driver = ScriptedDriver::new(texts, Vec::new());
    let mut pipeline = pipeline_with(driver);

    pipeline.generate_story(&brief()).await.unwrap();
    pipeline.generate_character_images().await.unwrap();
    let backgrounds = pipeline.generate_background_images().await.unwrap();
    assert_eq!(backgrounds.attempted(), 0);
    pipeline.generate_scene_descriptions().await.unwrap();

    let report = pipeline.generate_scene_composites().await.unwrap();
    assert_eq!(report.skipped, scene_count);
    assert_eq!(report.produced, 0);
    assert_eq!(pipeline.state(), RunState::CompositesReady);
}

#[tokio::test]
async fn cancellation_between_items_preserves_produced_assets() {
    let texts = vec![story_json(&["Kael", "Lyra", "Mira"], 0)];
    let driver = ScriptedDriver::new(texts, Vec::new());
    let plan = driver.cancel_plan();
    let store = Arc::new(MemoryStore::new());
    let mut pipeline = Pipeline::new(driver, store.clone() as Arc<dyn AssetStore>, test_config());

    // Arm the pipeline's own token to fire after the first portrait call.
    *plan.lock().unwrap() = Some((1, pipeline.cancellation_token()));

    pipeline.generate_story(&brief()).await.unwrap();
    let error = pipeline.generate_character_images().await.unwrap_err();

    let FabulaErrorKind::Pipeline(pipeline_error) = error.kind() else {
        panic!("expected pipeline error, got {error}");
    };
    let PipelineErrorKind::Cancelled { completed, .. } = &pipeline_error.kind else {
        panic!("expected cancellation, got {pipeline_error}");
    };
    assert_eq!(*completed, 1);

    // The first portrait survives the abort; the batch never advanced the
    // state ladder.
    assert_eq!(pipeline.characters().len(), 1);
    assert!(store.exists(&AssetId::character("Kael")).await.unwrap());
    assert_eq!(pipeline.state(), RunState::StoryReady);
}

#[tokio::test]
async fn scene_count_is_a_request_not_a_guarantee() {
    let texts = vec![story_json(&[], 1), scenes_json(3)];
    let driver = ScriptedDriver::new(texts, Vec::new());
    let store: Arc<dyn AssetStore> = Arc::new(MemoryStore::new());
    let mut pipeline = Pipeline::new(driver, store, test_config().with_scene_count(9));

    pipeline.generate_story(&brief()).await.unwrap();
    pipeline.generate_character_images().await.unwrap();
    pipeline.generate_background_images().await.unwrap();
    let scenes = pipeline.generate_scene_descriptions().await.unwrap();

    assert_eq!(scenes.len(), 3);
}

#[tokio::test]
async fn regenerating_a_character_overwrites_its_asset() {
    let texts = vec![story_json(&["Kael"], 0)];
    let images = vec![ImageReply::Bytes(vec![1]), ImageReply::Bytes(vec![2])];
    let driver = ScriptedDriver::new(texts, images);
    let store = Arc::new(MemoryStore::new());
    let mut pipeline = Pipeline::new(driver, store.clone() as Arc<dyn AssetStore>, test_config());

    pipeline.generate_story(&brief()).await.unwrap();
    pipeline.generate_character_images().await.unwrap();
    let id = AssetId::character("Kael");
    assert_eq!(store.get(&id).await.unwrap(), vec![1]);

    let spec = pipeline.story().characters()[0].clone();
    pipeline.generate_character_image(&spec).await.unwrap();
    assert_eq!(store.get(&id).await.unwrap(), vec![2]);
    assert_eq!(pipeline.characters().len(), 1);
}

#[tokio::test]
async fn script_without_script_key_is_rejected() {
    let scene_count = 2;
    let texts = vec![
        story_json(&[], 1),
        scenes_json(scene_count),
        r#"{"scenes": ["not a script"]}"#.to_string(),
    ];
    let driver = ScriptedDriver::new(texts, Vec::new());
    let mut pipeline = pipeline_with(driver);

    pipeline.generate_story(&brief()).await.unwrap();
    pipeline.generate_character_images().await.unwrap();
    pipeline.generate_background_images().await.unwrap();
    pipeline.generate_scene_descriptions().await.unwrap();
    pipeline.generate_scene_composites().await.unwrap();

    let error = pipeline.generate_script().await.unwrap_err();
    assert!(matches!(error.kind(), FabulaErrorKind::Contract(_)));
    assert_eq!(pipeline.state(), RunState::CompositesReady);
}

#[tokio::test]
async fn audio_item_failures_are_isolated() {
    let scene_count = 2;
    let texts = vec![
        story_json(&[], 1),
        scenes_json(scene_count),
        script_json(scene_count),
        audio_json(),
        "no json in this reply".to_string(),
    ];
    let driver = ScriptedDriver::new(texts, Vec::new());
    let mut pipeline = pipeline_with(driver);

    pipeline.generate_story(&brief()).await.unwrap();
    pipeline.generate_character_images().await.unwrap();
    pipeline.generate_background_images().await.unwrap();
    pipeline.generate_scene_descriptions().await.unwrap();
    pipeline.generate_scene_composites().await.unwrap();
    pipeline.generate_script().await.unwrap();

    let report = pipeline.generate_audio_descriptions().await.unwrap();
    assert_eq!(report.produced, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(pipeline.audio().len(), 1);
    assert_eq!(pipeline.state(), RunState::AudioReady);
}
