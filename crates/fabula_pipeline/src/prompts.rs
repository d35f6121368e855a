//! Prompt builders for every pipeline stage.
//!
//! Each builder renders one stage's instruction text. The wording encodes
//! the consistency rules the composite stage depends on: background plates
//! must stay empty of figures, character portraits must sit on plain white,
//! and scene descriptions must map onto the already-generated backgrounds.

use fabula_core::{CharacterSpec, StoryBrief, StoryData};

fn bulleted(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn cast_list(characters: &[CharacterSpec]) -> String {
    characters
        .iter()
        .map(|character| {
            format!(
                "- {} | traits: {} | appearance: {}",
                character.name, character.traits, character.appearance
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Story stage prompt: storyline, cast, and empty background plates in one
/// JSON contract.
pub fn story(brief: &StoryBrief) -> String {
    format!(
        r#"You are a creative story writer and art director. Produce a JSON object by following these steps in order.

Step 1. Write a "storyline" of about 300 words based on the topic, description, and style below.
Step 2. Identify every character in the storyline and build the "character_descriptions" list. Each entry must have a "name", "traits", and "appearance".
Step 3. Re-read the storyline and pick five distinct physical locations that carry the story's progression. Describe each one for the "background_descriptions" list.

Rules for "background_descriptions":
- These descriptions will become EMPTY background images. They must not mention any characters, people, creatures, or figures.
- Describe the physical environment only. Set the stage.
- The five descriptions should vary and follow the narrative order of the storyline.

Respond with exactly this JSON shape:
{{
  "storyline": "...",
  "character_descriptions": [ {{"name": "...", "traits": "...", "appearance": "..."}} ],
  "background_descriptions": ["...", "...", "...", "...", "..."]
}}

Topic: {topic}
Story Description: {description}
Style: {style}"#,
        topic = brief.topic(),
        description = brief.description(),
        style = brief.style(),
    )
}

/// Character portrait prompt: one character isolated on pure white.
pub fn character(character: &CharacterSpec, style: &str) -> String {
    format!(
        r#"Create high-quality character concept art of a single character, with only that character in the final output.

Character Name: {name}
Art Style: {style}
Character Appearance: {appearance}
Character Traits: {traits}

Background instructions:
- The background must be a solid, plain white color.
- No other elements, objects, shadows, or ground textures.
- The character stands isolated on the pure white background in a neutral standing pose."#,
        name = character.name,
        appearance = character.appearance,
        traits = character.traits,
    )
}

/// Background plate prompt: an empty environment with open space for
/// characters to be composited in later.
pub fn background(description: &str, style: &str) -> String {
    format!(
        r#"Generate a high-quality background illustration to be used as a background plate in a composite scene.

Art Style: {style}
Scene Description: "{description}"

Composition rules:
1. Create open space: leave significant negative space in the foreground or mid-ground where characters will be placed later.
2. Framing: a medium or wide shot with a clear view of the environment and the open space.
3. Avoid central clutter: keep the main focus of the background off-center.
4. No figures: the image must be an environment only, with absolutely no people, characters, or creatures.

The final image should read as an intentionally incomplete stage, ready for its actors."#,
    )
}

/// Scene description prompt: place the cast into the available backgrounds,
/// one JSON array of scene texts.
pub fn scenes(story: &StoryData, style: &str, scene_count: usize) -> String {
    let storyline = story.storyline().unwrap_or_default();
    format!(
        r#"You are a meticulous scene director. Generate exactly {scene_count} visually grounded scene descriptions for the storyline below, placing the listed characters into the available backgrounds.

Instructions:
- For each scene, select the most fitting background from the list. A background may be reused when the story stays in one place.
- Decide which characters are present in each scene; not every character appears in every scene.
- Describe what is happening, each present character's position and body language, and relative positions within the chosen background.
- Begin each description by briefly naming the chosen background.

Respond with exactly this JSON shape:
{{"scenes": ["Scene 1: ...", "Scene 2: ...", ...]}}

STORYLINE:
{storyline}

CHARACTERS:
{characters}

AVAILABLE BACKGROUNDS:
{backgrounds}

ART STYLE: {style}"#,
        characters = cast_list(story.characters()),
        backgrounds = bulleted(story.backgrounds()),
    )
}

/// Composite instruction text, the first part of every composite prompt.
pub fn composite(scene_text: &str, style: &str) -> String {
    format!(
        r#"Create a high-quality composite illustration in {style} style. Do not add any text or speech bubbles.
Scene description: "{scene_text}"

Composition and consistency rules:
1. Fixed background: use the provided image as the definitive, unchangeable background. Do not add or remove background elements.
2. Accurate placement: place the characters exactly as described, matching their locations, actions, and spatial relationships.
3. Perspective and depth: match character scale to the background; nearer characters appear larger.
4. Lighting: match character lighting and shadows to the background's light source.
5. Grounding: characters must interact with surfaces realistically and cast shadows; no floating or clipping.
6. Identity: do not swap, merge, or duplicate characters; keep faces, clothing, and posture consistent with the reference images.
7. No additional characters beyond those described in the scene."#,
    )
}

/// Fixed text introducing the background reference image.
pub fn background_reference() -> String {
    "Use this image as the background:".to_string()
}

/// Fixed text introducing the character reference images.
pub fn character_references() -> String {
    "Place these characters consistently within the scene:".to_string()
}

/// Script stage prompt: narration and dialogue per scene.
pub fn script(storyline: &str, scene_texts: &[String]) -> String {
    format!(
        r#"You are a scriptwriter. Based on the storyline and scene descriptions below, write narration and dialogue for each scene.

Respond with exactly this JSON shape:
{{"script": [{{"scene": 1, "narration": "...", "dialogue": "..."}}]}}

STORYLINE:
{storyline}

SCENES:
{scenes}"#,
        scenes = bulleted(scene_texts),
    )
}

/// Audio stage prompt: background music and SFX for one scene.
pub fn audio(scene_text: &str) -> String {
    format!(
        r#"You are a sound designer. Describe the background music and sound effects for this scene.

Respond with exactly this JSON shape:
{{"audio_description": "..."}}

SCENE: "{scene_text}""#,
    )
}
