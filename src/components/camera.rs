//! 摄像头采集组件
//!
//! 摄像头是独占资源，必须保证所有退出路径都释放：
//! 采集成功、取消、页面切到后台 (visibilitychange)、
//! 页面卸载 (pagehide)、组件卸载 (on_cleanup)。
//! 组件挂载即开流，父组件用 `<Show>` 控制是否渲染。

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack, VisibilityState};

/// 从 canvas 的 data URL 中剥离 `data:image/jpeg;base64,` 前缀
pub fn strip_data_url_prefix(data_url: &str) -> Option<&str> {
    let mut parts = data_url.splitn(2, ',');
    let header = parts.next()?;
    let payload = parts.next()?;
    if header.starts_with("data:") && header.ends_with(";base64") {
        Some(payload)
    } else {
        None
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        track.unchecked_into::<MediaStreamTrack>().stop();
    }
}

#[component]
pub fn CameraCapture(
    /// 采集成功，参数为去掉前缀的 base64 JPEG
    #[prop(into)]
    on_capture: Callback<String>,
    /// 用户取消
    #[prop(into)]
    on_cancel: Callback<()>,
    /// 开流或采集失败
    #[prop(into)]
    on_error: Callback<String>,
    #[prop(into, default = "Capture".to_string())] capture_label: String,
) -> impl IntoView {
    let video_ref = NodeRef::<leptos::html::Video>::new();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let stream = StoredValue::new_local(None::<MediaStream>);
    let (ready, set_ready) = signal(false);

    let stop_camera = move || {
        stream.update_value(|slot| {
            if let Some(s) = slot.take() {
                stop_tracks(&s);
            }
        });
        if let Some(video) = video_ref.get_untracked() {
            video.set_src_object(None);
        }
        set_ready.set(false);
    };

    // 视频节点挂载后开流
    Effect::new(move |_| {
        let Some(video) = video_ref.get() else {
            return;
        };
        if stream.with_value(|s| s.is_some()) {
            return;
        }
        spawn_local(async move {
            let devices = web_sys::window()
                .and_then(|w| w.navigator().media_devices().ok());
            let Some(devices) = devices else {
                on_error.run("Camera is not available in this browser".to_string());
                return;
            };

            let constraints = MediaStreamConstraints::new();
            constraints.set_video(&JsValue::TRUE);

            let promise = match devices.get_user_media_with_constraints(&constraints) {
                Ok(p) => p,
                Err(_) => {
                    on_error.run("Unable to access camera".to_string());
                    return;
                }
            };
            match JsFuture::from(promise).await {
                Ok(value) => {
                    let media: MediaStream = value.unchecked_into();
                    video.set_src_object(Some(&media));
                    let _ = video.play();
                    stream.set_value(Some(media));
                    set_ready.set(true);
                }
                Err(_) => {
                    on_error.run("Camera permission denied".to_string());
                }
            }
        });
    });

    // 页面隐藏/卸载时释放摄像头。闭包句柄是 !Send，
    // 存进线程本地的 StoredValue，清理时经句柄取回再摘除。
    let listeners = StoredValue::new_local(None::<(Closure<dyn Fn()>, Closure<dyn Fn()>)>);
    {
        let vis_closure = Closure::<dyn Fn()>::new(move || {
            let hidden = web_sys::window()
                .map(|w| {
                    w.document().map(|d| d.visibility_state()) == Some(VisibilityState::Hidden)
                })
                .unwrap_or(false);
            if hidden {
                stop_camera();
            }
        });
        let pagehide_closure = Closure::<dyn Fn()>::new(move || {
            stop_camera();
        });
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                let _ = document.add_event_listener_with_callback(
                    "visibilitychange",
                    vis_closure.as_ref().unchecked_ref(),
                );
            }
            let _ = window.add_event_listener_with_callback(
                "pagehide",
                pagehide_closure.as_ref().unchecked_ref(),
            );
        }
        listeners.set_value(Some((vis_closure, pagehide_closure)));
    }

    on_cleanup(move || {
        stop_camera();
        listeners.update_value(|slot| {
            if let Some((vis_closure, pagehide_closure)) = slot.take() {
                if let Some(window) = web_sys::window() {
                    if let Some(document) = window.document() {
                        let _ = document.remove_event_listener_with_callback(
                            "visibilitychange",
                            vis_closure.as_ref().unchecked_ref(),
                        );
                    }
                    let _ = window.remove_event_listener_with_callback(
                        "pagehide",
                        pagehide_closure.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    });

    let capture = move |_| {
        let (Some(video), Some(canvas)) = (video_ref.get_untracked(), canvas_ref.get_untracked())
        else {
            return;
        };
        // 用视频原生分辨率，避免缩放损失识别精度
        let width = video.video_width();
        let height = video.video_height();
        if width == 0 || height == 0 {
            on_error.run("Camera is still starting, try again".to_string());
            return;
        }
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<web_sys::CanvasRenderingContext2d>().ok());
        let Some(ctx) = ctx else {
            on_error.run("Canvas is not available".to_string());
            return;
        };
        if ctx
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .is_err()
        {
            on_error.run("Failed to capture frame".to_string());
            return;
        }

        match canvas.to_data_url_with_type("image/jpeg") {
            Ok(data_url) => match strip_data_url_prefix(&data_url) {
                Some(b64) => {
                    let b64 = b64.to_string();
                    stop_camera();
                    on_capture.run(b64);
                }
                None => on_error.run("Unexpected capture format".to_string()),
            },
            Err(_) => on_error.run("Failed to encode frame".to_string()),
        }
    };

    let cancel = move |_| {
        stop_camera();
        on_cancel.run(());
    };

    view! {
        <div class="flex flex-col items-center gap-4">
            <video
                node_ref=video_ref
                autoplay
                playsinline
                class="rounded-lg border border-base-300 w-full max-w-md bg-black"
            ></video>
            <canvas node_ref=canvas_ref class="hidden"></canvas>
            <div class="flex gap-2">
                <button class="btn btn-primary" disabled=move || !ready.get() on:click=capture>
                    {capture_label}
                </button>
                <button class="btn" on:click=cancel>
                    "Cancel"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_jpeg_prefix() {
        assert_eq!(
            strip_data_url_prefix("data:image/jpeg;base64,/9j/4AAQ"),
            Some("/9j/4AAQ")
        );
    }

    #[test]
    fn rejects_non_data_urls() {
        assert_eq!(strip_data_url_prefix("/9j/4AAQ"), None);
        assert_eq!(strip_data_url_prefix("data:text/plain,hello"), None);
    }

    #[test]
    fn keeps_commas_inside_payload() {
        assert_eq!(
            strip_data_url_prefix("data:image/png;base64,a,b,c"),
            Some("a,b,c")
        );
    }
}
