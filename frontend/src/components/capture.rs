use super::utils::{debounce, first_image_file, is_image_type, split_data_url};
use gloo_file::File as GlooFile;
use gloo_file::callbacks::FileReader;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    DragEvent, HtmlCanvasElement, HtmlInputElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::prelude::*;

const MSG_CAMERA_UNAVAILABLE: &str =
    "Não foi possível acessar a câmera. Envie um arquivo de imagem.";
const MSG_CAMERA_NOT_READY: &str = "A câmera ainda não está pronta. Tente novamente.";
const CAPTURE_JPEG_QUALITY: f64 = 0.92;

/// What the widget hands to its parent for every acquired image:
/// bare base64 payload, the source mime type, and a data URL preview.
#[derive(Clone, PartialEq)]
pub struct CapturedImage {
    pub base64: String,
    pub mime_type: String,
    pub preview: String,
}

#[derive(Clone, Copy, PartialEq)]
pub enum Mode {
    Upload,
    Camera,
}

pub enum Msg {
    SwitchTo(Mode),
    SetDragging(bool),
    HandleDrop(DragEvent),
    FileChosen(Event),
    DataUrlRead { mime_type: String, data_url: String },
    StreamReady(MediaStream),
    StreamFailed(String),
    TakePhoto,
}

#[derive(Properties, PartialEq)]
pub struct CaptureProps {
    pub on_image: Callback<CapturedImage>,
    #[prop_or(false)]
    pub disabled: bool,
}

/// Image acquisition widget: drag/drop or file picker, plus a live
/// camera mode. The camera stream is owned here and stopped on capture,
/// on mode switch, and on teardown.
pub struct Capture {
    mode: Mode,
    is_dragging: bool,
    camera_error: Option<String>,
    stream: Option<MediaStream>,
    video_ref: NodeRef,
    reader: Option<FileReader>,
}

impl Component for Capture {
    type Message = Msg;
    type Properties = CaptureProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            mode: Mode::Upload,
            is_dragging: false,
            camera_error: None,
            stream: None,
            video_ref: NodeRef::default(),
            reader: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SwitchTo(mode) => self.handle_switch(ctx, mode),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging && !ctx.props().disabled;
                true
            }
            Msg::HandleDrop(event) => self.handle_drop(ctx, event),
            Msg::FileChosen(event) => self.handle_file_chosen(ctx, event),
            Msg::DataUrlRead {
                mime_type,
                data_url,
            } => self.handle_data_url(ctx, mime_type, data_url),
            Msg::StreamReady(stream) => self.handle_stream_ready(stream),
            Msg::StreamFailed(message) => {
                log::warn!("Camera unavailable: {}", message);
                self.camera_error = Some(message);
                self.mode = Mode::Upload;
                true
            }
            Msg::TakePhoto => self.handle_take_photo(ctx),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        // Attach the stream once the <video> element exists.
        if let (Some(stream), Some(video)) =
            (&self.stream, self.video_ref.cast::<HtmlVideoElement>())
        {
            if video.src_object().is_none() {
                video.set_src_object(Some(stream));
                let _ = video.play();
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.stop_stream();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let disabled = ctx.props().disabled;

        html! {
            <div class="capture-widget">
                { self.render_mode_tabs(ctx, disabled) }
                {
                    match self.mode {
                        Mode::Upload => self.render_upload(ctx, disabled),
                        Mode::Camera => self.render_camera(ctx, disabled),
                    }
                }
                { self.render_camera_error() }
            </div>
        }
    }
}

// Handler methods
impl Capture {
    fn handle_switch(&mut self, ctx: &Context<Self>, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        // Leaving camera mode always releases the device.
        self.stop_stream();
        self.camera_error = None;
        self.mode = mode;

        if mode == Mode::Camera {
            self.request_camera(ctx);
        }
        true
    }

    fn request_camera(&self, ctx: &Context<Self>) {
        let link = ctx.link().clone();

        spawn_local(async move {
            match open_camera_stream().await {
                Ok(stream) => link.send_message(Msg::StreamReady(stream)),
                Err(e) => {
                    log::error!("getUserMedia failed: {:?}", e);
                    link.send_message(Msg::StreamFailed(MSG_CAMERA_UNAVAILABLE.into()));
                }
            }
        });
    }

    fn handle_stream_ready(&mut self, stream: MediaStream) -> bool {
        if self.mode != Mode::Camera {
            // User already switched away; do not keep the device open.
            stop_tracks(&stream);
            return false;
        }
        self.stream = Some(stream);
        true
    }

    fn handle_drop(&mut self, ctx: &Context<Self>, event: DragEvent) -> bool {
        event.prevent_default();
        self.is_dragging = false;

        if ctx.props().disabled {
            return true;
        }
        if let Some(file) = event
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| first_image_file(&files))
        {
            self.read_file(ctx, file);
        }
        true
    }

    fn handle_file_chosen(&mut self, ctx: &Context<Self>, event: Event) -> bool {
        let input: HtmlInputElement = event.target_unchecked_into();
        let file = input.files().and_then(|files| first_image_file(&files));
        input.set_value("");

        match file {
            Some(file) if !ctx.props().disabled => {
                self.read_file(ctx, file);
                true
            }
            _ => false,
        }
    }

    fn read_file(&mut self, ctx: &Context<Self>, file: web_sys::File) {
        let mime_type = file.type_();
        if !is_image_type(&mime_type) {
            return;
        }

        let link = ctx.link().clone();
        let reader = gloo_file::callbacks::read_as_data_url(&GlooFile::from(file), move |result| {
            match result {
                Ok(data_url) => link.send_message(Msg::DataUrlRead {
                    mime_type: mime_type.clone(),
                    data_url,
                }),
                Err(e) => log::error!("Failed to read file: {:?}", e),
            }
        });
        // Dropping the handle would abort the read.
        self.reader = Some(reader);
    }

    fn handle_data_url(&mut self, ctx: &Context<Self>, mime_type: String, data_url: String) -> bool {
        self.reader = None;
        if let Some(base64) = split_data_url(&data_url) {
            ctx.props().on_image.emit(CapturedImage {
                base64: base64.to_string(),
                mime_type,
                preview: data_url.clone(),
            });
        }
        false
    }

    fn handle_take_photo(&mut self, ctx: &Context<Self>) -> bool {
        if ctx.props().disabled {
            return false;
        }
        let Some(video) = self.video_ref.cast::<HtmlVideoElement>() else {
            return false;
        };
        if video.video_width() == 0 {
            // No frames delivered yet; a capture now would encode an
            // empty 0x0 canvas. Keep the stream so the user can retry.
            self.camera_error = Some(MSG_CAMERA_NOT_READY.into());
            return true;
        }

        match capture_frame(&video) {
            Ok(data_url) => {
                // Device released as soon as the frame is frozen.
                self.stop_stream();
                self.camera_error = None;
                self.mode = Mode::Upload;

                if let Some(base64) = split_data_url(&data_url) {
                    ctx.props().on_image.emit(CapturedImage {
                        base64: base64.to_string(),
                        mime_type: "image/jpeg".to_string(),
                        preview: data_url.clone(),
                    });
                }
                true
            }
            Err(e) => {
                log::error!("Frame capture failed: {:?}", e);
                self.stop_stream();
                self.camera_error = Some(MSG_CAMERA_UNAVAILABLE.into());
                self.mode = Mode::Upload;
                true
            }
        }
    }

    fn stop_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            stop_tracks(&stream);
        }
    }
}

// Rendering methods
impl Capture {
    fn render_mode_tabs(&self, ctx: &Context<Self>, disabled: bool) -> Html {
        let link = ctx.link();
        let tab_class = |mode: Mode| {
            classes!("mode-tab", (self.mode == mode).then_some("active"))
        };

        html! {
            <div class="mode-tabs">
                <button
                    class={tab_class(Mode::Upload)}
                    disabled={disabled}
                    onclick={link.callback(|_| Msg::SwitchTo(Mode::Upload))}
                >
                    {"📁 Enviar arquivo"}
                </button>
                <button
                    class={tab_class(Mode::Camera)}
                    disabled={disabled}
                    onclick={link.callback(|_| Msg::SwitchTo(Mode::Camera))}
                >
                    {"📷 Usar câmera"}
                </button>
            </div>
        }
    }

    fn render_upload(&self, ctx: &Context<Self>, disabled: bool) -> Html {
        let link = ctx.link();

        let handle_drag_over = link.callback(|e: DragEvent| {
            e.prevent_default();
            Msg::SetDragging(true)
        });
        let handle_drag_leave = link.callback(|e: DragEvent| {
            e.prevent_default();
            Msg::SetDragging(false)
        });
        let handle_drop = link.callback(Msg::HandleDrop);
        let handle_change = link.callback(Msg::FileChosen);

        let trigger_file_input = move || {
            if disabled {
                return;
            }
            if let Some(input) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("file-input"))
            {
                if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                    html_input.click();
                }
            }
        };

        html! {
            <>
                <input
                    type="file"
                    id="file-input"
                    accept="image/jpeg,image/png,image/gif,image/webp"
                    style="display: none;"
                    onchange={handle_change}
                    disabled={disabled}
                />
                <div
                    id="drop-zone"
                    class={classes!(
                        "upload-area",
                        self.is_dragging.then_some("drag-over"),
                        disabled.then_some("disabled"),
                    )}
                    ondragover={handle_drag_over}
                    ondragleave={handle_drag_leave}
                    ondrop={handle_drop}
                    onclick={debounce(300, trigger_file_input)}
                >
                    <span class="upload-icon">{"🌿"}</span>
                    <p>
                        { if self.is_dragging {
                            "Solte a imagem aqui"
                        } else {
                            "Arraste uma imagem ou clique para selecionar"
                        }}
                    </p>
                    <p class="file-types">{"JPEG, PNG, WebP ou GIF"}</p>
                </div>
            </>
        }
    }

    fn render_camera(&self, ctx: &Context<Self>, disabled: bool) -> Html {
        let link = ctx.link();

        html! {
            <div class="camera-area">
                <video
                    ref={self.video_ref.clone()}
                    autoplay=true
                    playsinline=true
                    muted=true
                />
                {
                    if self.stream.is_some() {
                        html! {
                            <button
                                class="capture-btn"
                                disabled={disabled}
                                onclick={link.callback(|_| Msg::TakePhoto)}
                            >
                                {"Tirar foto"}
                            </button>
                        }
                    } else {
                        html! { <p class="camera-hint">{"Aguardando a câmera..."}</p> }
                    }
                }
            </div>
        }
    }

    fn render_camera_error(&self) -> Html {
        if let Some(message) = &self.camera_error {
            html! { <p class="camera-error">{ message }</p> }
        } else {
            html! {}
        }
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Environment-facing camera at an ideal 1280x720.
fn video_constraints() -> Result<JsValue, JsValue> {
    let ideal = |value: f64| -> Result<JsValue, JsValue> {
        let obj = js_sys::Object::new();
        Reflect::set(&obj, &"ideal".into(), &value.into())?;
        Ok(obj.into())
    };

    let video = js_sys::Object::new();
    Reflect::set(&video, &"facingMode".into(), &"environment".into())?;
    Reflect::set(&video, &"width".into(), &ideal(1280.0)?)?;
    Reflect::set(&video, &"height".into(), &ideal(720.0)?)?;
    Ok(video.into())
}

async fn open_camera_stream() -> Result<MediaStream, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let devices = window.navigator().media_devices()?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraints()?);
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices.get_user_media_with_constraints(&constraints)?;
    let stream = JsFuture::from(promise).await?;
    stream.dyn_into::<MediaStream>()
}

/// Freezes the current video frame at native resolution and encodes
/// it as JPEG.
fn capture_frame(video: &HtmlVideoElement) -> Result<String, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
    canvas.set_width(video.video_width());
    canvas.set_height(video.video_height());

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()?;
    context.draw_image_with_html_video_element(video, 0.0, 0.0)?;

    canvas.to_data_url_with_type_and_encoder_options(
        "image/jpeg",
        &JsValue::from_f64(CAPTURE_JPEG_QUALITY),
    )
}
