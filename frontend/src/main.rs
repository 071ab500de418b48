mod components;

use components::capture::{Capture, CapturedImage};
use components::results::render_plant;
use gloo_net::http::Request;
use shared::{ErrorResponse, IdentifyRequest, IdentifyResponse, Plant};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const MSG_CONNECTION_FAILED: &str = "Falha ao conectar com o servidor. Verifique sua conexão.";
const MSG_UNKNOWN_ERROR: &str = "Erro desconhecido.";

/// One tagged state per screen. The preview travels with the state so a
/// reset drops it together with everything else.
enum AppState {
    Idle,
    Loading { preview: String },
    Result { plant: Plant, preview: String },
    Error { message: String },
}

enum Msg {
    ImageCaptured(CapturedImage),
    IdentifySucceeded(Plant),
    IdentifyFailed(String),
    Reset,
}

struct App {
    state: AppState,
}

/// A response only lands while we are still waiting for one; anything
/// arriving after a reset is dropped.
fn apply_success(state: &AppState, plant: Plant) -> Option<AppState> {
    match state {
        AppState::Loading { preview } => Some(AppState::Result {
            plant,
            preview: preview.clone(),
        }),
        _ => None,
    }
}

fn apply_failure(state: &AppState, message: String) -> Option<AppState> {
    match state {
        AppState::Loading { .. } => Some(AppState::Error { message }),
        _ => None,
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            state: AppState::Idle,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ImageCaptured(image) => {
                if matches!(self.state, AppState::Loading { .. }) {
                    return false;
                }
                self.state = AppState::Loading {
                    preview: image.preview.clone(),
                };
                self.send_identify_request(ctx, image);
                true
            }
            Msg::IdentifySucceeded(plant) => {
                if let Some(next) = apply_success(&self.state, plant) {
                    self.state = next;
                    true
                } else {
                    false
                }
            }
            Msg::IdentifyFailed(message) => {
                if let Some(next) = apply_failure(&self.state, message) {
                    self.state = next;
                    true
                } else {
                    false
                }
            }
            Msg::Reset => {
                self.state = AppState::Idle;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let loading = matches!(self.state, AppState::Loading { .. });

        html! {
            <main class="page">
                <header class="app-header">
                    <span class="app-icon">{"🌺"}</span>
                    <h1>{"Identificador de Plantas"}</h1>
                    <p class="subtitle">
                        {"Envie uma foto de qualquer planta, flor ou árvore para identificá-la \
                          e saber sobre riscos e comestibilidade."}
                    </p>
                </header>

                {
                    if !matches!(self.state, AppState::Result { .. }) {
                        html! {
                            <Capture
                                on_image={link.callback(Msg::ImageCaptured)}
                                disabled={loading}
                            />
                        }
                    } else {
                        html! {}
                    }
                }

                { self.render_state(ctx) }
            </main>
        }
    }
}

impl App {
    fn send_identify_request(&self, ctx: &Context<Self>, image: CapturedImage) {
        let link = ctx.link().clone();

        spawn_local(async move {
            let body = IdentifyRequest {
                image: image.base64,
                mime_type: image.mime_type,
            };
            let request = match Request::post("/api/identify").json(&body) {
                Ok(request) => request,
                Err(e) => {
                    log::error!("Failed to build identify request: {:?}", e);
                    link.send_message(Msg::IdentifyFailed(MSG_CONNECTION_FAILED.into()));
                    return;
                }
            };

            match request.send().await {
                Ok(response) if response.ok() => {
                    match response.json::<IdentifyResponse>().await {
                        Ok(body) => link.send_message(Msg::IdentifySucceeded(body.plant)),
                        Err(e) => {
                            log::error!("Failed to parse identify response: {:?}", e);
                            link.send_message(Msg::IdentifyFailed(MSG_UNKNOWN_ERROR.into()));
                        }
                    }
                }
                Ok(response) => {
                    let message = response
                        .json::<ErrorResponse>()
                        .await
                        .map(|body| body.error)
                        .unwrap_or_else(|_| MSG_UNKNOWN_ERROR.into());
                    link.send_message(Msg::IdentifyFailed(message));
                }
                Err(e) => {
                    log::error!("Identify request failed: {:?}", e);
                    link.send_message(Msg::IdentifyFailed(MSG_CONNECTION_FAILED.into()));
                }
            }
        });
    }

    fn render_state(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        match &self.state {
            AppState::Idle => html! {},
            AppState::Loading { preview } => html! {
                <div class="preview-frame">
                    <img src={preview.clone()} alt="Imagem selecionada" />
                    <div class="loading-overlay">
                        <div class="spinner"></div>
                        <p>{"Analisando imagem..."}</p>
                    </div>
                </div>
            },
            AppState::Error { message } => html! {
                <div class="error-box">
                    <span class="error-icon">{"❌"}</span>
                    <p>{ message }</p>
                    <button class="link-btn" onclick={link.callback(|_| Msg::Reset)}>
                        {"Tentar novamente"}
                    </button>
                </div>
            },
            AppState::Result { plant, preview } => html! {
                <div class="result-area">
                    <div class="preview-frame">
                        <img src={preview.clone()} alt="Planta identificada" />
                    </div>
                    { render_plant(plant) }
                    <button class="reset-btn" onclick={link.callback(|_| Msg::Reset)}>
                        {"Analisar outra planta"}
                    </button>
                </div>
            },
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
