use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::{AlertHost, Notice};
use crate::components::camera::CameraCapture;
use crate::components::navbar::Navbar;
use crate::session::{session_api, use_session};
use facesure_shared::FaceRegisterRequest;

/// 学生人脸注册页
///
/// 注册成功后把会话的 `face_enrolled` 置位并重新落库，
/// 守卫随即放行学生面板。
#[component]
pub fn RegisterFacePage() -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let user_id = session.user_id.clone();
    let token = session.token.clone();

    let (camera_open, set_camera_open) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (notice, set_notice) = signal(Option::<Notice>::None);

    let on_capture = {
        let user_id = user_id.clone();
        let token = token.clone();
        move |image_b64: String| {
            set_camera_open.set(false);
            set_is_submitting.set(true);
            let user_id = user_id.clone();
            let token = token.clone();
            spawn_local(async move {
                let api = session_api(&session_ctx, token);
                let req = FaceRegisterRequest {
                    user_id: user_id.clone(),
                    user_type: "student".to_string(),
                    image_b64,
                };
                match api.face_register(&req).await {
                    Ok(_) => {
                        set_notice.set(Some(Notice::success("Face registered")));
                        if let Some(mut s) = session_ctx.session_signal().get_untracked() {
                            s.face_enrolled = true;
                            session_ctx.set_session(s);
                        }
                    }
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <Navbar />
            <div class="max-w-md mx-auto p-4 space-y-4">
                <AlertHost notice=notice set_notice=set_notice />

                <div class="card bg-base-100 shadow">
                    <div class="card-body items-center text-center space-y-2">
                        <h2 class="card-title">"Register Your Face"</h2>
                        <p class="text-sm opacity-70">
                            "A face photo is required before you can raise gate-pass requests."
                        </p>

                        <Show
                            when=move || camera_open.get()
                            fallback=move || {
                                view! {
                                    <button
                                        class="btn btn-primary"
                                        disabled=move || is_submitting.get()
                                        on:click=move |_| set_camera_open.set(true)
                                    >
                                        "Start Camera"
                                    </button>
                                }
                            }
                        >
                            <CameraCapture
                                on_capture=on_capture.clone()
                                on_cancel=move |_| set_camera_open.set(false)
                                on_error=move |msg: String| {
                                    set_camera_open.set(false);
                                    set_notice.set(Some(Notice::error(msg)));
                                }
                                capture_label="Capture & Register"
                            />
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
    .into_any()
}
