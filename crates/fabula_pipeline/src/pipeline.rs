//! The pipeline orchestrator.

use crate::{
    ItemOutcome, Pacer, PipelineConfig, RunState, StageExecutor, composer, parse_contract, prompts,
};
use fabula_core::{
    AssetId, AudioContract, AudioDescription, BackgroundAsset, CharacterAsset, CharacterSpec,
    PromptPart, SceneComposite, SceneSpec, ScenesContract, ScriptContract, ScriptEntry, StoryBrief,
    StoryData,
};
use fabula_error::{FabulaErrorKind, FabulaResult, PipelineError, PipelineErrorKind};
use fabula_interface::{GenerativeDriver, StageReport};
use fabula_store::AssetStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const STAGE_CHARACTERS: &str = "character_images";
const STAGE_BACKGROUNDS: &str = "background_images";
const STAGE_SCENES: &str = "scene_descriptions";
const STAGE_COMPOSITES: &str = "scene_composites";
const STAGE_SCRIPT: &str = "script";
const STAGE_AUDIO: &str = "audio_descriptions";

/// Orchestrates one narrative run across all generation stages.
///
/// The pipeline owns the stage sequencing: a [`RunState`] ladder gates each
/// stage on its predecessor, batch stages isolate per-item failures into a
/// [`StageReport`], and all generated bytes land in the injected
/// [`AssetStore`] under deterministic logical ids. The driver and store are
/// injected at construction; the pipeline holds no global state.
///
/// # Examples
///
/// ```no_run
/// use fabula_core::StoryBriefBuilder;
/// use fabula_pipeline::{Pipeline, PipelineConfig};
/// use fabula_store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn run(driver: impl fabula_interface::GenerativeDriver) -> fabula_error::FabulaResult<()> {
/// let brief = StoryBriefBuilder::default()
///     .topic("The Discovery of Fire")
///     .description("A curious cave dweller discovers fire by accident.")
///     .style("cave painting")
///     .build()
///     .unwrap();
///
/// let mut pipeline = Pipeline::new(driver, Arc::new(MemoryStore::new()), PipelineConfig::default());
/// pipeline.generate_story(&brief).await?;
/// pipeline.generate_character_images().await?;
/// pipeline.generate_background_images().await?;
/// pipeline.generate_scene_descriptions().await?;
/// pipeline.generate_scene_composites().await?;
/// pipeline.generate_script().await?;
/// pipeline.generate_audio_descriptions().await?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<D> {
    executor: StageExecutor<D>,
    store: Arc<dyn AssetStore>,
    config: PipelineConfig,
    pacer: Pacer,
    cancel: CancellationToken,
    run_id: Uuid,
    state: RunState,
    style: String,
    story: StoryData,
    characters: Vec<CharacterAsset>,
    backgrounds: Vec<BackgroundAsset>,
    scenes: Vec<SceneSpec>,
    composites: Vec<SceneComposite>,
    script: Vec<ScriptEntry>,
    audio: Vec<AudioDescription>,
}

impl<D: GenerativeDriver> Pipeline<D> {
    /// Construct a pipeline over an injected driver and asset store.
    pub fn new(driver: D, store: Arc<dyn AssetStore>, config: PipelineConfig) -> Self {
        let pacer = Pacer::new(config.item_delay());
        Self {
            executor: StageExecutor::new(driver),
            store,
            config,
            pacer,
            cancel: CancellationToken::new(),
            run_id: Uuid::new_v4(),
            state: RunState::default(),
            style: String::new(),
            story: StoryData::default(),
            characters: Vec::new(),
            backgrounds: Vec::new(),
            scenes: Vec::new(),
            composites: Vec::new(),
            script: Vec::new(),
            audio: Vec::new(),
        }
    }

    /// The run identifier used in tracing spans.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Where the run currently stands on the stage ladder.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The accepted story contract. Empty until the story stage completes.
    pub fn story(&self) -> &StoryData {
        &self.story
    }

    /// Character assets produced so far, in creation order.
    pub fn characters(&self) -> &[CharacterAsset] {
        &self.characters
    }

    /// Background assets produced so far, in description order. Failed
    /// items leave no entry, so indices may be sparse.
    pub fn backgrounds(&self) -> &[BackgroundAsset] {
        &self.backgrounds
    }

    /// Accepted scene descriptions in story order.
    pub fn scenes(&self) -> &[SceneSpec] {
        &self.scenes
    }

    /// Scene composites produced so far.
    pub fn composites(&self) -> &[SceneComposite] {
        &self.composites
    }

    /// The accepted script entries.
    pub fn script(&self) -> &[ScriptEntry] {
        &self.script
    }

    /// Audio descriptions produced so far.
    pub fn audio(&self) -> &[AudioDescription] {
        &self.audio
    }

    /// A token callers can trigger to stop batch stages between items.
    /// Assets produced before the stop survive.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn check_cancelled(&self, stage: &str, completed: usize) -> FabulaResult<()> {
        if self.cancel.is_cancelled() {
            tracing::warn!(stage, completed, "run cancelled between items");
            Err(PipelineError::new(PipelineErrorKind::Cancelled {
                stage: stage.to_string(),
                completed,
            })
            .into())
        } else {
            Ok(())
        }
    }

    /// Generate the story contract from a caller brief.
    ///
    /// Accepting the contract requires a parseable JSON object with a
    /// `storyline` key; the cast and background lists may be empty, in
    /// which case downstream batches produce zero items.
    ///
    /// # Errors
    ///
    /// Propagates driver failures and contract extraction, parse, or
    /// missing-field errors. The run state is unchanged on failure.
    #[tracing::instrument(skip(self, brief), fields(run_id = %self.run_id, topic = %brief.topic()))]
    pub async fn generate_story(&mut self, brief: &StoryBrief) -> FabulaResult<&StoryData> {
        let prompt = prompts::story(brief);
        let response = self.executor.run_text(&prompt).await?;
        let story: StoryData = parse_contract(&response)?;
        story.storyline()?;
        tracing::info!(
            characters = story.characters().len(),
            backgrounds = story.backgrounds().len(),
            "story contract accepted"
        );
        self.style = brief.style().clone();
        self.story = story;
        self.state.advance_to(RunState::StoryReady);
        Ok(&self.story)
    }

    /// Generate one character portrait and store it under the character's
    /// logical id, overwriting any previous portrait for the same name.
    ///
    /// Returns `None` when the call failed or returned no image data; the
    /// failure is logged and the run continues.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the story stage and propagates store
    /// failures.
    #[tracing::instrument(skip(self, character), fields(run_id = %self.run_id, name = %character.name))]
    pub async fn generate_character_image(
        &mut self,
        character: &CharacterSpec,
    ) -> FabulaResult<Option<CharacterAsset>> {
        self.state.require(RunState::StoryReady, STAGE_CHARACTERS)?;
        let prompt = prompts::character(character, &self.style);
        let parts = [PromptPart::Text(prompt)];
        match self.executor.run_multimodal(&parts).await {
            ItemOutcome::Image(data) => {
                let id = AssetId::character(&character.name);
                if self.store.exists(&id).await? {
                    tracing::warn!(id = %id, "overwriting existing character asset");
                }
                self.store.put(&id, &data).await?;
                let asset = CharacterAsset {
                    owner: character.name.clone(),
                    id,
                };
                self.characters.retain(|existing| existing.id != asset.id);
                self.characters.push(asset.clone());
                Ok(Some(asset))
            }
            ItemOutcome::NoImageData => {
                tracing::warn!(name = %character.name, "no image data, continuing");
                Ok(None)
            }
            ItemOutcome::Failed(error) => {
                tracing::error!(%error, name = %character.name, "character generation failed, continuing");
                Ok(None)
            }
        }
    }

    /// Generate a portrait for every character in the story contract.
    ///
    /// Item failures are isolated: a failed portrait degrades the report
    /// but never aborts the batch. The batch replaces all prior character
    /// assets for the run.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the story stage, `Cancelled` when the
    /// token fires between items, and propagates store failures.
    #[tracing::instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn generate_character_images(&mut self) -> FabulaResult<StageReport> {
        self.state.require(RunState::StoryReady, STAGE_CHARACTERS)?;
        let specs = self.story.characters().to_vec();
        let mut report = StageReport::default();
        self.characters.clear();
        for (position, spec) in specs.iter().enumerate() {
            self.check_cancelled(STAGE_CHARACTERS, position)?;
            if position > 0 {
                self.pacer.pause().await;
            }
            match self.generate_character_image(spec).await? {
                Some(_) => report.record_produced(),
                None => report.record_failed(),
            }
        }
        self.state.advance_to(RunState::CharactersReady);
        tracing::info!(
            produced = report.produced,
            failed = report.failed,
            "character image stage complete"
        );
        Ok(report)
    }

    /// Generate a background plate for every background description in the
    /// story contract.
    ///
    /// Item failures are isolated and leave no asset for their index, so
    /// the background list may be sparse relative to the descriptions.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the character stage, `Cancelled` when
    /// the token fires between items, and propagates store failures.
    #[tracing::instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn generate_background_images(&mut self) -> FabulaResult<StageReport> {
        self.state
            .require(RunState::CharactersReady, STAGE_BACKGROUNDS)?;
        let descriptions = self.story.backgrounds().to_vec();
        let mut report = StageReport::default();
        self.backgrounds.clear();
        for (index, description) in descriptions.iter().enumerate() {
            self.check_cancelled(STAGE_BACKGROUNDS, index)?;
            if index > 0 {
                self.pacer.pause().await;
            }
            let prompt = prompts::background(description, &self.style);
            let parts = [PromptPart::Text(prompt)];
            match self.executor.run_multimodal(&parts).await {
                ItemOutcome::Image(data) => {
                    let id = AssetId::background(index);
                    self.store.put(&id, &data).await?;
                    self.backgrounds.push(BackgroundAsset { index, id });
                    report.record_produced();
                }
                ItemOutcome::NoImageData => {
                    tracing::warn!(index, "no image data for background, continuing");
                    report.record_failed();
                }
                ItemOutcome::Failed(error) => {
                    tracing::error!(%error, index, "background generation failed, continuing");
                    report.record_failed();
                }
            }
        }
        self.state.advance_to(RunState::BackgroundsReady);
        tracing::info!(
            produced = report.produced,
            failed = report.failed,
            "background image stage complete"
        );
        Ok(report)
    }

    /// Generate scene descriptions mapping the cast onto the backgrounds.
    ///
    /// The configured scene count is a request; whatever count the model
    /// returns is accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the background stage and propagates
    /// driver and contract failures.
    #[tracing::instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn generate_scene_descriptions(&mut self) -> FabulaResult<&[SceneSpec]> {
        self.state.require(RunState::BackgroundsReady, STAGE_SCENES)?;
        let prompt = prompts::scenes(&self.story, &self.style, *self.config.scene_count());
        let response = self.executor.run_text(&prompt).await?;
        let contract: ScenesContract = parse_contract(&response)?;
        let specs = contract.into_specs();
        if specs.len() != *self.config.scene_count() {
            tracing::warn!(
                requested = *self.config.scene_count(),
                returned = specs.len(),
                "scene count differs from request, accepting"
            );
        }
        self.scenes = specs;
        self.state.advance_to(RunState::ScenesReady);
        Ok(&self.scenes)
    }

    /// Generate one scene composite from its background and the full cast
    /// of character portraits.
    ///
    /// Returns `None` when the generative call failed or returned no image
    /// data.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the scene stage,
    /// `NoBackgroundAvailable` when no background assets exist, and a store
    /// not-found error when a referenced asset is missing from the store.
    #[tracing::instrument(skip(self, scene), fields(run_id = %self.run_id, scene = scene.index))]
    pub async fn generate_scene_composite(
        &mut self,
        scene: &SceneSpec,
    ) -> FabulaResult<Option<SceneComposite>> {
        self.state.require(RunState::ScenesReady, STAGE_COMPOSITES)?;
        let background = composer::select_background(scene, &self.backgrounds)?.clone();
        let background_bytes = self.store.get(&background.id).await?;
        let mut character_bytes = Vec::with_capacity(self.characters.len());
        for character in &self.characters {
            character_bytes.push(self.store.get(&character.id).await?);
        }
        let parts = composer::compose(scene, &self.style, background_bytes, character_bytes);
        match self.executor.run_multimodal(&parts).await {
            ItemOutcome::Image(data) => {
                let id = AssetId::scene(scene.index);
                self.store.put(&id, &data).await?;
                let composite = SceneComposite {
                    index: scene.index,
                    id,
                };
                self.composites
                    .retain(|existing| existing.index != composite.index);
                self.composites.push(composite.clone());
                Ok(Some(composite))
            }
            ItemOutcome::NoImageData => {
                tracing::warn!(scene = scene.index, "no image data for composite, continuing");
                Ok(None)
            }
            ItemOutcome::Failed(error) => {
                tracing::error!(%error, scene = scene.index, "composite generation failed, continuing");
                Ok(None)
            }
        }
    }

    /// Generate a composite for every accepted scene description.
    ///
    /// Scenes with no available background are skipped; other item
    /// failures are isolated into the report.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the scene stage, `Cancelled` when the
    /// token fires between items, and propagates store failures for
    /// missing reference assets.
    #[tracing::instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn generate_scene_composites(&mut self) -> FabulaResult<StageReport> {
        self.state.require(RunState::ScenesReady, STAGE_COMPOSITES)?;
        let scenes = self.scenes.clone();
        let mut report = StageReport::default();
        self.composites.clear();
        for (position, scene) in scenes.iter().enumerate() {
            self.check_cancelled(STAGE_COMPOSITES, position)?;
            if position > 0 {
                self.pacer.pause().await;
            }
            match self.generate_scene_composite(scene).await {
                Ok(Some(_)) => report.record_produced(),
                Ok(None) => report.record_failed(),
                Err(error) => match error.kind() {
                    FabulaErrorKind::Pipeline(pipeline)
                        if matches!(
                            pipeline.kind,
                            PipelineErrorKind::NoBackgroundAvailable(_)
                        ) =>
                    {
                        tracing::warn!(scene = scene.index, "no background available, skipping");
                        report.record_skipped();
                    }
                    _ => return Err(error),
                },
            }
        }
        self.state.advance_to(RunState::CompositesReady);
        tracing::info!(
            produced = report.produced,
            failed = report.failed,
            skipped = report.skipped,
            "scene composite stage complete"
        );
        Ok(report)
    }

    /// Generate the narration and dialogue script over all scenes.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the composite stage and propagates
    /// driver and contract failures, including a missing `script` key.
    #[tracing::instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn generate_script(&mut self) -> FabulaResult<&[ScriptEntry]> {
        self.state.require(RunState::CompositesReady, STAGE_SCRIPT)?;
        let storyline = self.story.storyline()?.to_string();
        let scene_texts: Vec<String> = self.scenes.iter().map(|s| s.text.clone()).collect();
        let prompt = prompts::script(&storyline, &scene_texts);
        let response = self.executor.run_text(&prompt).await?;
        let contract: ScriptContract = parse_contract(&response)?;
        self.script = contract.into_entries()?;
        self.state.advance_to(RunState::ScriptReady);
        tracing::info!(entries = self.script.len(), "script accepted");
        Ok(&self.script)
    }

    /// Generate the audio description for one scene.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the script stage and propagates
    /// driver and contract failures, including a missing
    /// `audio_description` key.
    #[tracing::instrument(skip(self, scene), fields(run_id = %self.run_id, scene = scene.index))]
    pub async fn generate_audio_description(
        &mut self,
        scene: &SceneSpec,
    ) -> FabulaResult<AudioDescription> {
        self.state.require(RunState::ScriptReady, STAGE_AUDIO)?;
        let prompt = prompts::audio(&scene.text);
        let response = self.executor.run_text(&prompt).await?;
        let contract: AudioContract = parse_contract(&response)?;
        let description = contract.into_description(scene.index)?;
        self.audio
            .retain(|existing| existing.scene_index != description.scene_index);
        self.audio.push(description.clone());
        Ok(description)
    }

    /// Generate an audio description for every scene.
    ///
    /// Audio descriptions are independent per scene, so item failures are
    /// isolated into the report.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` before the script stage and `Cancelled` when
    /// the token fires between items.
    #[tracing::instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn generate_audio_descriptions(&mut self) -> FabulaResult<StageReport> {
        self.state.require(RunState::ScriptReady, STAGE_AUDIO)?;
        let scenes = self.scenes.clone();
        let mut report = StageReport::default();
        self.audio.clear();
        for (position, scene) in scenes.iter().enumerate() {
            self.check_cancelled(STAGE_AUDIO, position)?;
            if position > 0 {
                self.pacer.pause().await;
            }
            match self.generate_audio_description(scene).await {
                Ok(_) => report.record_produced(),
                Err(error) => {
                    tracing::error!(%error, scene = scene.index, "audio description failed, continuing");
                    report.record_failed();
                }
            }
        }
        self.state.advance_to(RunState::AudioReady);
        tracing::info!(
            produced = report.produced,
            failed = report.failed,
            "audio description stage complete"
        );
        Ok(report)
    }
}

impl<D> std::fmt::Debug for Pipeline<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("run_id", &self.run_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
