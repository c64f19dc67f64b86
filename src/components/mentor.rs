use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::{AlertHost, Notice};
use crate::components::navbar::Navbar;
use crate::components::requests_table::RequestsTable;
use crate::session::{session_api, use_session};
use facesure_shared::{
    FacultyProfile, LeaveRequest, MentorApproval, MentorRejection, RequestAction, Role,
};

/// 导师审批目标：一次只处理一张单
#[derive(Clone)]
struct PendingDecision {
    request: LeaveRequest,
    approving: bool,
}

#[component]
pub fn MentorDashboard() -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let user_id = session.user_id.clone();
    let token = session.token.clone();

    let (profile, set_profile) = signal(Option::<FacultyProfile>::None);
    let (requests, set_requests) = signal(Vec::<LeaveRequest>::new());
    let (decision, set_decision) = signal(Option::<PendingDecision>::None);
    let (remark, set_remark) = signal(String::new());
    let (parent_contacted, set_parent_contacted) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (notice, set_notice) = signal(Option::<Notice>::None);

    let api = session_api(&session_ctx, token);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let fetch_all = {
        let api = api.clone();
        let user_id = user_id.clone();
        move || {
            let api = api.clone();
            let user_id = user_id.clone();
            spawn_local(async move {
                match api.faculty(&user_id).await {
                    Ok(p) => set_profile.set(Some(p)),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                match api.mentor_pending(&user_id).await {
                    Ok(list) => set_requests.set(list),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };
    fetch_all();

    // 弹窗随 decision 开关
    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if decision.get().is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let open_decision = move |(action, request): (RequestAction, LeaveRequest)| {
        set_remark.set(String::new());
        set_parent_contacted.set(false);
        set_decision.set(Some(PendingDecision {
            request,
            approving: action == RequestAction::MentorApprove,
        }));
    };

    let cancel = move |_| set_decision.set(None);

    let submit_decision = {
        let api = api.clone();
        let user_id = user_id.clone();
        let fetch_all = fetch_all.clone();
        move |_| {
            let Some(d) = decision.get_untracked() else {
                return;
            };
            let text = remark.get_untracked().trim().to_string();
            if text.is_empty() {
                set_notice.set(Some(Notice::error("Remark is required")));
                return;
            }
            let mentor_name = profile
                .get_untracked()
                .map(|p| p.name)
                .unwrap_or_default();
            set_is_submitting.set(true);
            let api = api.clone();
            let user_id = user_id.clone();
            let fetch_all = fetch_all.clone();
            spawn_local(async move {
                let request_id = d.request.id().to_string();
                let result = if d.approving {
                    api.mentor_approve(
                        &request_id,
                        &MentorApproval {
                            mentor_id: user_id,
                            mentor_name,
                            remark: text,
                            parent_contacted: parent_contacted.get_untracked(),
                        },
                    )
                    .await
                } else {
                    api.mentor_reject(
                        &request_id,
                        &MentorRejection {
                            mentor_id: user_id,
                            mentor_name,
                            remark: text,
                        },
                    )
                    .await
                };
                match result {
                    Ok(_) => {
                        set_notice.set(Some(Notice::success(if d.approving {
                            "Request approved"
                        } else {
                            "Request rejected"
                        })));
                        set_decision.set(None);
                        fetch_all();
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
            <div class="max-w-5xl mx-auto p-4 space-y-4">
                <AlertHost notice=notice set_notice=set_notice />

                <h2 class="text-2xl font-bold">
                    "Pending Requests"
                    {move || profile.get().map(|p| format!(" · {}", p.name))}
                </h2>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <RequestsTable
                            role=Role::Mentor
                            requests=Signal::derive(move || requests.get())
                            on_action=open_decision
                        />
                    </div>
                </div>
            </div>

            <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_decision.set(None)>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || {
                            match decision.get() {
                                Some(d) if d.approving => "Approve Request",
                                Some(_) => "Reject Request",
                                None => "",
                            }
                        }}
                    </h3>
                    <p class="py-2 text-sm opacity-70">
                        {move || {
                            decision
                                .get()
                                .map(|d| {
                                    format!(
                                        "{} ({}): {}",
                                        d.request.student_name,
                                        d.request.student_id,
                                        d.request.reason,
                                    )
                                })
                        }}
                    </p>

                    <div class="form-control">
                        <label class="label" for="remark">
                            <span class="label-text">"Remark"</span>
                        </label>
                        <textarea
                            id="remark"
                            class="textarea textarea-bordered"
                            prop:value=remark
                            on:input=move |ev| set_remark.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <Show when=move || decision.get().is_some_and(|d| d.approving)>
                        <label class="label cursor-pointer justify-start gap-2 mt-2">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-sm"
                                prop:checked=parent_contacted
                                on:change=move |ev| {
                                    set_parent_contacted.set(event_target_checked(&ev))
                                }
                            />
                            <span class="label-text">"Parent contacted"</span>
                        </label>
                    </Show>

                    <div class="modal-action">
                        <button class="btn" on:click=cancel>
                            "Cancel"
                        </button>
                        <button
                            class="btn btn-primary"
                            disabled=move || is_submitting.get()
                            on:click=submit_decision
                        >
                            "Submit"
                        </button>
                    </div>
                </div>
            </dialog>
        </div>
    }
    .into_any()
}
