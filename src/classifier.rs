//! Trigger classification pipeline.
//!
//! Decodes a submitted frame, normalizes it to RGB JPEG, ships it to a
//! vision model with the detection prompt, and parses the model's JSON
//! reply into a verdict. Every failure along the way degrades to an
//! error-flagged verdict rather than failing the request.

use base64::Engine;
use image::ImageReader;
use image::codecs::jpeg::JpegEncoder;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::vision::VisionClient;

/// Visual content classes considered unsafe for the target audience.
pub const TRIGGER_LIST: [&str; 10] = [
    "smoking",
    "cigarette",
    "vape",
    "alcohol",
    "drinking",
    "drug paraphernalia",
    "weapon",
    "violence",
    "harmful substances",
    "inappropriate content",
];

const JPEG_QUALITY: u8 = 85;
const DEFAULT_REASON: &str = "No triggers detected";

/// Classification result for a single frame. `error` distinguishes
/// "classifier ran and found nothing" from "classifier could not run".
#[derive(Debug, Clone, Serialize)]
pub struct TriggerVerdict {
    #[serde(rename = "hasTrigger")]
    pub has_trigger: bool,
    pub reason: String,
    pub error: bool,
}

impl TriggerVerdict {
    fn failed(reason: String) -> Self {
        Self {
            has_trigger: false,
            reason,
            error: true,
        }
    }
}

/// Build the detection prompt: the trigger categories plus the exact JSON
/// shape the model must reply with.
pub fn detection_prompt() -> String {
    format!(
        "You are a content moderation system for addiction recovery support. \
         Analyze this image and determine if it contains ANY of these triggers:\n\n\
         {}\n\n\
         Respond ONLY with JSON in this exact format:\n\
         {{\"hasTrigger\": true/false, \"reason\": \"brief explanation\"}}\n\n\
         If you detect ANY trigger, set hasTrigger to true.",
        TRIGGER_LIST.join(", ")
    )
}

/// Run the full pipeline on raw image bytes. Never returns an error:
/// decode failures, transport failures, and malformed replies all fold
/// into an error-flagged verdict. At most one remote invocation, no
/// retries.
pub async fn classify(image_bytes: &[u8], vision: &VisionClient) -> TriggerVerdict {
    println!(
        "[classifier] Starting vision analysis on {} bytes",
        image_bytes.len()
    );

    let data_url = match encode_frame(image_bytes) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("[classifier] Failed to decode image: {}", e);
            return TriggerVerdict::failed(format!("Failed to decode image: {}", e));
        }
    };

    let prompt = detection_prompt();
    let text = match vision.chat_with_image(&prompt, &data_url).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("[classifier] LLM error: {}", e);
            return TriggerVerdict::failed(format!("LLM error: {}", e));
        }
    };

    // Parse failures are reported separately from transport failures, but
    // yield the same error-verdict shape.
    match parse_verdict(&text) {
        Ok(verdict) => {
            println!(
                "[classifier] Parsed: hasTrigger={}, reason='{}'",
                verdict.has_trigger, verdict.reason
            );
            verdict
        }
        Err(e) => {
            eprintln!("[classifier] Malformed LLM reply: {}", e);
            TriggerVerdict::failed(format!("Malformed LLM reply: {}", e))
        }
    }
}

/// Decode the frame, convert to RGB if needed, re-encode as JPEG (quality
/// 85), and wrap as an inline data URL.
fn encode_frame(image_bytes: &[u8]) -> Result<String, image::ImageError> {
    let img = ImageReader::new(Cursor::new(image_bytes))
        .with_guessed_format()?
        .decode()?;

    let rgb = img.to_rgb8();
    drop(img);

    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(buf.get_ref());
    Ok(format!("data:image/jpeg;base64,{}", b64))
}

/// Strip a fenced code block wrapper from a model reply, if present.
/// Handles both tagged (```json) and bare (```) fences.
fn strip_code_fence(text: &str) -> String {
    if let Some(rest) = text.split("```json").nth(1) {
        rest.split("```").next().unwrap_or("").trim().to_string()
    } else if let Some(inner) = text.split("```").nth(1) {
        inner.trim().to_string()
    } else {
        text.trim().to_string()
    }
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(rename = "hasTrigger", default)]
    has_trigger: bool,
    #[serde(default = "default_reason")]
    reason: String,
}

fn default_reason() -> String {
    DEFAULT_REASON.to_string()
}

fn parse_verdict(text: &str) -> Result<TriggerVerdict, serde_json::Error> {
    let cleaned = strip_code_fence(text);
    let raw: RawVerdict = serde_json::from_str(&cleaned)?;
    Ok(TriggerVerdict {
        has_trigger: raw.has_trigger,
        reason: raw.reason,
        error: false,
    })
}
