use serde_json::{Value, json};

/// Instruction sent alongside the image. Fixes the response language and
/// the no-plant fallback so the model always emits a schema-valid record.
pub const PROMPT: &str = "\
Você é um especialista em botânica e biologia vegetal. Analise a imagem e \
identifique a planta, flor, árvore, arbusto, fungo ou qualquer vegetal presente.

Responda SEMPRE em português brasileiro.

Para \"description\": escreva 2-3 frases sobre a planta.
Para \"toxic_to\": quem pode ser afetado (ex: \"humanos\", \"cães\", \"gatos\").
Para \"dangerous_parts\": partes perigosas (ex: \"folhas\", \"sementes\", \"todas as partes\").
Para \"symptoms\": sintomas de envenenamento mais comuns.
Para \"edible_parts\": partes que podem ser consumidas.
Para \"preparation\": como preparar para consumo, ou string vazia se não comestível.

Se a imagem não contiver planta alguma: identified=false, not_a_plant=true, \
demais campos com valores padrão.";

/// Request-time constraint on the model's output shape. This mirrors
/// `shared::Plant`; the deserialization into that type afterwards is the
/// actual validation boundary.
pub fn response_schema() -> Value {
    fn string_array() -> Value {
        json!({ "type": "ARRAY", "items": { "type": "STRING" } })
    }
    json!({
        "type": "OBJECT",
        "properties": {
            "identified": { "type": "BOOLEAN" },
            "not_a_plant": { "type": "BOOLEAN" },
            "confidence": { "type": "STRING", "enum": ["high", "medium", "low"] },
            "name": {
                "type": "OBJECT",
                "properties": {
                    "common": { "type": "STRING" },
                    "scientific": { "type": "STRING" },
                    "family": { "type": "STRING" },
                },
                "required": ["common", "scientific", "family"],
            },
            "description": { "type": "STRING" },
            "toxicity": {
                "type": "OBJECT",
                "properties": {
                    "is_toxic": { "type": "BOOLEAN" },
                    "toxic_to": string_array(),
                    "dangerous_parts": string_array(),
                    "symptoms": string_array(),
                    "severity": {
                        "type": "STRING",
                        "enum": ["none", "mild", "moderate", "severe", "fatal"],
                    },
                },
                "required": ["is_toxic", "toxic_to", "dangerous_parts", "symptoms", "severity"],
            },
            "edibility": {
                "type": "OBJECT",
                "properties": {
                    "is_edible": { "type": "BOOLEAN" },
                    "edible_parts": string_array(),
                    "preparation": { "type": "STRING" },
                    "warnings": string_array(),
                },
                "required": ["is_edible", "edible_parts", "preparation", "warnings"],
            },
        },
        "required": [
            "identified",
            "not_a_plant",
            "confidence",
            "name",
            "description",
            "toxicity",
            "edibility",
        ],
    })
}

/// Full `generateContent` request body: inline image, prompt, and the
/// JSON-mode generation config.
pub fn request_body(image: &str, mime_type: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inline_data": { "mime_type": mime_type, "data": image } },
                { "text": PROMPT },
            ],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

/// Pulls the first text part out of a `generateContent` response document.
pub fn candidate_text(doc: &Value) -> Option<&str> {
    doc.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text").and_then(Value::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_every_top_level_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "identified",
            "not_a_plant",
            "confidence",
            "name",
            "description",
            "toxicity",
            "edibility",
        ] {
            assert!(required.contains(&field), "missing required field {field}");
        }
    }

    #[test]
    fn schema_closes_the_enumerations() {
        let schema = response_schema();
        assert_eq!(
            schema["properties"]["confidence"]["enum"],
            json!(["high", "medium", "low"])
        );
        assert_eq!(
            schema["properties"]["toxicity"]["properties"]["severity"]["enum"],
            json!(["none", "mild", "moderate", "severe", "fatal"])
        );
    }

    #[test]
    fn request_body_embeds_image_and_prompt() {
        let body = request_body("QUJD", "image/png");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[0]["inline_data"]["data"], "QUJD");
        assert_eq!(parts[1]["text"], PROMPT);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn candidate_text_reads_the_first_text_part() {
        let doc = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "thought": true },
                        { "text": "{\"identified\":true}" },
                    ],
                },
            }],
        });
        assert_eq!(candidate_text(&doc), Some("{\"identified\":true}"));
    }

    #[test]
    fn candidate_text_is_none_for_empty_documents() {
        assert_eq!(candidate_text(&json!({})), None);
        assert_eq!(candidate_text(&json!({ "candidates": [] })), None);
    }
}
