use crate::gemini::VisionModel;
use actix_files::Files;
use actix_web::{HttpResponse, web};
use log::{error, info, warn};
use shared::{ACCEPTED_MIME_TYPES, ErrorResponse, IdentifyRequest, IdentifyResponse};

const MSG_MISSING_FIELDS: &str = "Imagem e tipo MIME são obrigatórios.";
const MSG_INVALID_MIME: &str = "Tipo de imagem inválido. Use JPEG, PNG, GIF ou WebP.";
const MSG_ANALYSIS_FAILED: &str = "Falha ao analisar a imagem. Tente novamente.";

/// Base64-encoded photos run several megabytes; the default 256 KB
/// payload limit would reject them before the handler runs.
const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// API routes only, shared with the endpoint tests.
pub fn configure_api<M: VisionModel>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
        .service(web::resource("/api/identify").route(web::post().to(handle_identify::<M>)));
}

pub fn configure_routes<M: VisionModel>(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api::<M>(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: message.to_string(),
    })
}

async fn handle_identify<M: VisionModel>(
    model: web::Data<M>,
    body: web::Bytes,
) -> HttpResponse {
    // Parsed by hand so malformed bodies get the same 400 envelope as
    // missing fields instead of actix's default error page.
    let request = match serde_json::from_slice::<IdentifyRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected unparseable identify request: {}", e);
            return bad_request(MSG_MISSING_FIELDS);
        }
    };

    if request.image.is_empty() || request.mime_type.is_empty() {
        return bad_request(MSG_MISSING_FIELDS);
    }
    if !ACCEPTED_MIME_TYPES.contains(&request.mime_type.as_str()) {
        warn!("Rejected unsupported mime type: {}", request.mime_type);
        return bad_request(MSG_INVALID_MIME);
    }

    match model.identify(&request.image, &request.mime_type).await {
        Ok(plant) => {
            if plant.not_a_plant {
                info!("No plant found in the submitted image");
            } else {
                info!(
                    "Identified \"{}\" ({}) confidence={}",
                    plant.name.common, plant.name.scientific, plant.confidence
                );
            }
            HttpResponse::Ok().json(IdentifyResponse { plant })
        }
        Err(e) => {
            error!("Erro ao identificar planta: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: MSG_ANALYSIS_FAILED.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GeminiError;
    use actix_web::{App, test};
    use shared::{Confidence, Edibility, Plant, PlantName, Severity, Toxicity};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    struct StubModel {
        plant: Option<Plant>,
        calls: Arc<AtomicUsize>,
    }

    impl StubModel {
        fn returning(plant: Plant) -> Self {
            Self {
                plant: Some(plant),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                plant: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl VisionModel for StubModel {
        async fn identify(&self, _image: &str, _mime_type: &str) -> Result<Plant, GeminiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.plant.clone().ok_or(GeminiError::EmptyResponse)
        }
    }

    fn fern() -> Plant {
        Plant {
            identified: true,
            not_a_plant: false,
            confidence: Confidence::High,
            name: PlantName {
                common: "Samambaia".into(),
                scientific: "Nephrolepis exaltata".into(),
                family: "Nephrolepidaceae".into(),
            },
            description: "Uma samambaia comum de interiores.".into(),
            toxicity: Toxicity {
                is_toxic: false,
                toxic_to: vec![],
                dangerous_parts: vec![],
                symptoms: vec![],
                severity: Severity::None,
            },
            edibility: Edibility {
                is_edible: false,
                edible_parts: vec![],
                preparation: String::new(),
                warnings: vec![],
            },
        }
    }

    async fn post_identify(
        stub: StubModel,
        body: serde_json::Value,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(stub))
                .configure(configure_api::<StubModel>),
        )
        .await;
        let request = test::TestRequest::post()
            .uri("/api/identify")
            .set_json(body)
            .to_request();
        test::call_service(&app, request).await
    }

    #[actix_web::test]
    async fn valid_request_returns_the_plant() {
        let stub = StubModel::returning(fern());
        let response = post_identify(
            stub.clone(),
            serde_json::json!({ "image": "QUJD", "mimeType": "image/jpeg" }),
        )
        .await;

        assert_eq!(response.status(), 200);
        let body: IdentifyResponse = test::read_body_json(response).await;
        assert_eq!(body.plant, fern());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn camera_sized_image_is_accepted() {
        let stub = StubModel::returning(fern());
        // ~600 KB of base64, the ballpark of a 720p JPEG capture.
        let image = "QUJDRA==".repeat(75_000);
        let response = post_identify(
            stub.clone(),
            serde_json::json!({ "image": image, "mimeType": "image/jpeg" }),
        )
        .await;

        assert_eq!(response.status(), 200);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn missing_image_is_rejected_without_a_model_call() {
        let stub = StubModel::returning(fern());
        let response =
            post_identify(stub.clone(), serde_json::json!({ "mimeType": "image/jpeg" })).await;

        assert_eq!(response.status(), 400);
        let body: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(body.error, MSG_MISSING_FIELDS);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn missing_mime_type_is_rejected_without_a_model_call() {
        let stub = StubModel::returning(fern());
        let response = post_identify(stub.clone(), serde_json::json!({ "image": "QUJD" })).await;

        assert_eq!(response.status(), 400);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn unsupported_mime_type_is_rejected() {
        let stub = StubModel::returning(fern());
        let response = post_identify(
            stub.clone(),
            serde_json::json!({ "image": "QUJD", "mimeType": "image/bmp" }),
        )
        .await;

        assert_eq!(response.status(), 400);
        let body: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(body.error, MSG_INVALID_MIME);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn model_failure_maps_to_a_generic_500() {
        let stub = StubModel::failing();
        let response = post_identify(
            stub,
            serde_json::json!({ "image": "QUJD", "mimeType": "image/png" }),
        )
        .await;

        assert_eq!(response.status(), 500);
        let body: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(body.error, MSG_ANALYSIS_FAILED);
    }

    #[actix_web::test]
    async fn malformed_body_is_a_bad_request() {
        let stub = StubModel::returning(fern());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(stub.clone()))
                .configure(configure_api::<StubModel>),
        )
        .await;
        let request = test::TestRequest::post()
            .uri("/api/identify")
            .insert_header(("content-type", "application/json"))
            .set_payload("not json")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 400);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }
}
