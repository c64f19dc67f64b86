use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::{AlertHost, Notice};
use crate::components::camera::CameraCapture;
use crate::components::navbar::Navbar;
use crate::session::{mark_face_verified, session_api, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use facesure_shared::FaceVerifyRequest;

/// 门卫人脸核验页
///
/// 核验通过：写入本机标记，回门卫面板。
/// 不匹配或网络失败：留在本页，可重试。
#[component]
pub fn VerifyFacePage(student_id: String, request_id: String) -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let token = session.token.clone();

    let router = use_router();
    let (camera_open, set_camera_open) = signal(true);
    let (is_submitting, set_is_submitting) = signal(false);
    let (notice, set_notice) = signal(Option::<Notice>::None);

    let on_capture = {
        let student_id = student_id.clone();
        let request_id = request_id.clone();
        let token = token.clone();
        move |image_b64: String| {
            set_camera_open.set(false);
            set_is_submitting.set(true);
            let student_id = student_id.clone();
            let request_id = request_id.clone();
            let token = token.clone();
            spawn_local(async move {
                let api = session_api(&session_ctx, token);
                let req = FaceVerifyRequest {
                    user_id: student_id,
                    image_b64,
                };
                match api.face_verify(&req).await {
                    Ok(result) if result.verified => {
                        mark_face_verified(&request_id);
                        router.navigate_route(AppRoute::Guard);
                    }
                    Ok(_) => {
                        set_notice.set(Some(Notice::error("Face did not match. Try again.")));
                    }
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                set_is_submitting.set(false);
            });
        }
    };

    let back_to_dashboard = move |_| {
        router.navigate_route(AppRoute::Guard);
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <Navbar />
            <div class="max-w-md mx-auto p-4 space-y-4">
                <AlertHost notice=notice set_notice=set_notice />

                <div class="card bg-base-100 shadow">
                    <div class="card-body items-center text-center space-y-2">
                        <h2 class="card-title">"Verify Student Face"</h2>
                        <p class="text-sm opacity-70">{format!("Student: {student_id}")}</p>

                        <Show
                            when=move || camera_open.get()
                            fallback=move || {
                                view! {
                                    <div class="flex gap-2">
                                        <button
                                            class="btn btn-primary"
                                            disabled=move || is_submitting.get()
                                            on:click=move |_| set_camera_open.set(true)
                                        >
                                            "Retry"
                                        </button>
                                        <button class="btn" on:click=back_to_dashboard>
                                            "Back"
                                        </button>
                                    </div>
                                }
                            }
                        >
                            <CameraCapture
                                on_capture=on_capture.clone()
                                on_cancel=move |_| router.navigate_route(AppRoute::Guard)
                                on_error=move |msg: String| {
                                    set_camera_open.set(false);
                                    set_notice.set(Some(Notice::error(msg)));
                                }
                                capture_label="Capture & Verify"
                            />
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
    .into_any()
}
