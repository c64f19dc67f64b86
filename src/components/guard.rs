use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::{AlertHost, Notice};
use crate::components::confirm::{ConfirmDialog, ConfirmState};
use crate::components::navbar::Navbar;
use crate::components::requests_table::RequestsTable;
use crate::session::{clear_face_verified, session_api, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use facesure_shared::{GuardProfile, LeaveRequest, RequestAction, Role};

/// 门卫面板：本校区已批准的请假单
///
/// Verify 跳转人脸核验页；Left 只有在本机核验标记存在
/// （或服务端已记录 EXIT_ALLOWED）时可用，成功后清掉标记。
#[component]
pub fn GuardDashboard() -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let user_id = session.user_id.clone();
    let token = session.token.clone();

    let router = use_router();
    let (guard, set_guard) = signal(Option::<GuardProfile>::None);
    let (requests, set_requests) = signal(Vec::<LeaveRequest>::new());
    let (notice, set_notice) = signal(Option::<Notice>::None);
    let confirm = RwSignal::new(ConfirmState::<LeaveRequest>::new());

    let api = session_api(&session_ctx, token);

    let fetch_requests = {
        let api = api.clone();
        move |college: String| {
            let api = api.clone();
            spawn_local(async move {
                match api.guard_approved(&college).await {
                    Ok(list) => set_requests.set(list),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };
    {
        let api = api.clone();
        let fetch_requests = fetch_requests.clone();
        spawn_local(async move {
            match api.guard(&user_id).await {
                Ok(profile) => {
                    let college = profile.college.clone();
                    set_guard.set(Some(profile));
                    fetch_requests(college);
                }
                Err(msg) => set_notice.set(Some(Notice::error(msg))),
            }
        });
    }

    let on_action = move |(action, request): (RequestAction, LeaveRequest)| match action {
        RequestAction::VerifyFace => {
            router.navigate_route(AppRoute::GuardVerifyFace {
                student_id: request.student_id.clone(),
                request_id: request.id().to_string(),
            });
        }
        RequestAction::MarkLeft => {
            confirm.update(|c| {
                c.arm(request);
            });
        }
        _ => {}
    };

    let confirm_message = Signal::derive(move || {
        confirm.with(|c| {
            c.armed().map(|req| {
                format!(
                    "Mark {} ({}) as left campus?",
                    req.student_name, req.student_id,
                )
            })
        })
    });

    let run_armed = {
        let api = api.clone();
        move |_| {
            // 失败时保留武装状态，对话框不关，用户可重试或取消
            let Some(request) = confirm.with_untracked(|c| c.armed().cloned()) else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let request_id = request.id().to_string();
                match api.mark_left(&request_id).await {
                    Ok(_) => {
                        confirm.update(|c| {
                            c.take();
                        });
                        clear_face_verified(&request_id);
                        set_notice.set(Some(Notice::success("Marked as left campus")));
                        if let Some(college) = guard.get_untracked().map(|g| g.college) {
                            match api.guard_approved(&college).await {
                                Ok(list) => set_requests.set(list),
                                Err(msg) => set_notice.set(Some(Notice::error(msg))),
                            }
                        }
                    }
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <Navbar />
            <div class="max-w-5xl mx-auto p-4 space-y-4">
                <AlertHost notice=notice set_notice=set_notice />

                <h2 class="text-2xl font-bold">
                    "Gate Dashboard"
                    {move || guard.get().map(|g| format!(" · {}", g.college))}
                </h2>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h3 class="card-title">"Approved Requests"</h3>
                        <RequestsTable
                            role=Role::Guard
                            requests=Signal::derive(move || requests.get())
                            on_action=on_action
                        />
                    </div>
                </div>
            </div>

            <ConfirmDialog
                message=confirm_message
                on_confirm=run_armed
                on_cancel=move |_| confirm.update(|c| c.cancel())
            />
        </div>
    }
    .into_any()
}
