//! Assembly of multimodal composite prompts.
//!
//! Appearance consistency is achieved by reference supply: every composite
//! prompt carries the background plate and every character portrait as
//! reference images, in a fixed part ordering the model is instructed
//! against. No semantic filtering decides which characters a scene needs.

use crate::prompts;
use fabula_core::{BackgroundAsset, PromptPart, SceneSpec};
use fabula_error::{FabulaResult, PipelineError, PipelineErrorKind};

const PNG_MIME: &str = "image/png";

/// Select the background asset for a scene.
///
/// An explicit background index on the scene wins when it resolves to a
/// generated asset. Otherwise selection falls back to
/// `scene_index mod background_count` over the assets that exist, so a run
/// with fewer backgrounds than scenes wraps around deterministically.
///
/// # Errors
///
/// Returns `NoBackgroundAvailable` when no background assets exist; batch
/// loops record the scene as skipped.
pub fn select_background<'a>(
    scene: &SceneSpec,
    backgrounds: &'a [BackgroundAsset],
) -> FabulaResult<&'a BackgroundAsset> {
    if backgrounds.is_empty() {
        return Err(
            PipelineError::new(PipelineErrorKind::NoBackgroundAvailable(scene.index)).into(),
        );
    }
    if let Some(explicit) = scene.background {
        if let Some(asset) = backgrounds.iter().find(|asset| asset.index == explicit) {
            return Ok(asset);
        }
        tracing::warn!(
            scene = scene.index,
            background = explicit,
            "explicit background index has no asset, falling back to rotation"
        );
    }
    Ok(&backgrounds[scene.index % backgrounds.len()])
}

/// Build the ordered multimodal prompt for one scene composite.
///
/// The ordering is load-bearing: instruction text, background instruction,
/// background image, character instruction, then each character portrait in
/// creation order. Always exactly `4 + N` parts for `N` character images.
pub fn compose(
    scene: &SceneSpec,
    style: &str,
    background: Vec<u8>,
    characters: Vec<Vec<u8>>,
) -> Vec<PromptPart> {
    let mut parts = Vec::with_capacity(4 + characters.len());
    parts.push(PromptPart::Text(prompts::composite(&scene.text, style)));
    parts.push(PromptPart::Text(prompts::background_reference()));
    parts.push(PromptPart::Image {
        mime: Some(PNG_MIME.to_string()),
        data: background,
    });
    parts.push(PromptPart::Text(prompts::character_references()));
    for data in characters {
        parts.push(PromptPart::Image {
            mime: Some(PNG_MIME.to_string()),
            data,
        });
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::AssetId;
    use fabula_error::FabulaErrorKind;

    fn background_assets(count: usize) -> Vec<BackgroundAsset> {
        (0..count)
            .map(|index| BackgroundAsset {
                index,
                id: AssetId::background(index),
            })
            .collect()
    }

    #[test]
    fn composite_prompt_has_fixed_part_ordering() {
        let scene = SceneSpec::new(0, "Kael lights the first fire.");
        let parts = compose(
            &scene,
            "cave painting",
            vec![1, 2, 3],
            vec![vec![4], vec![5]],
        );
        assert_eq!(parts.len(), 6);
        assert!(!parts[0].is_image());
        assert!(!parts[1].is_image());
        assert!(parts[2].is_image());
        assert!(!parts[3].is_image());
        assert!(parts[4].is_image());
        assert!(parts[5].is_image());
    }

    #[test]
    fn composite_prompt_without_characters_has_four_parts() {
        let scene = SceneSpec::new(2, "An empty cavern waits.");
        let parts = compose(&scene, "ink", vec![9], Vec::new());
        assert_eq!(parts.len(), 4);
    }

    #[test]
    fn background_image_precedes_all_character_images() {
        let scene = SceneSpec::new(1, "The tribe gathers.");
        let parts = compose(&scene, "ink", vec![0xBB], vec![vec![0xC1], vec![0xC2]]);
        let first_image = parts.iter().position(PromptPart::is_image).unwrap();
        let PromptPart::Image { data, .. } = &parts[first_image] else {
            panic!("expected image part");
        };
        assert_eq!(data, &vec![0xBB]);
    }

    #[test]
    fn selection_wraps_scene_index_over_background_count() {
        let backgrounds = background_assets(5);
        let scene = SceneSpec::new(6, "Scene six.");
        let chosen = select_background(&scene, &backgrounds).unwrap();
        assert_eq!(chosen.index, 1);
    }

    #[test]
    fn explicit_background_index_wins() {
        let backgrounds = background_assets(5);
        let mut scene = SceneSpec::new(6, "Scene six.");
        scene.background = Some(4);
        let chosen = select_background(&scene, &backgrounds).unwrap();
        assert_eq!(chosen.index, 4);
    }

    #[test]
    fn unresolvable_explicit_index_falls_back_to_rotation() {
        let backgrounds = background_assets(3);
        let mut scene = SceneSpec::new(4, "Scene five.");
        scene.background = Some(7);
        let chosen = select_background(&scene, &backgrounds).unwrap();
        assert_eq!(chosen.index, 1);
    }

    #[test]
    fn no_backgrounds_is_an_error() {
        let scene = SceneSpec::new(0, "Nowhere to stand.");
        let error = select_background(&scene, &[]).unwrap_err();
        let FabulaErrorKind::Pipeline(pipeline) = error.kind() else {
            panic!("expected pipeline error, got {error}");
        };
        assert!(matches!(
            pipeline.kind,
            PipelineErrorKind::NoBackgroundAvailable(0)
        ));
    }
}
