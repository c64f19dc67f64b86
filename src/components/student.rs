use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::{AlertHost, Notice};
use crate::components::navbar::Navbar;
use crate::components::requests_table::RequestsTable;
use crate::session::{session_api, use_session};
use facesure_shared::{CreateLeaveRequest, LeaveRequest, Role, StudentProfile};

#[component]
pub fn StudentDashboard() -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let user_id = session.user_id.clone();
    let token = session.token.clone();

    let (profile, set_profile) = signal(Option::<StudentProfile>::None);
    let (requests, set_requests) = signal(Vec::<LeaveRequest>::new());
    let (reason, set_reason) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (notice, set_notice) = signal(Option::<Notice>::None);

    let api = session_api(&session_ctx, token);

    let fetch_all = {
        let api = api.clone();
        let user_id = user_id.clone();
        move || {
            let api = api.clone();
            let user_id = user_id.clone();
            spawn_local(async move {
                match api.student(&user_id).await {
                    Ok(p) => set_profile.set(Some(p)),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                match api.student_today_requests(&user_id).await {
                    Ok(list) => set_requests.set(list),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };
    fetch_all();

    let on_submit = {
        let api = api.clone();
        let user_id = user_id.clone();
        let fetch_all = fetch_all.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let text = reason.get_untracked().trim().to_string();
            if text.is_empty() {
                set_notice.set(Some(Notice::error("Reason is required")));
                return;
            }
            set_is_submitting.set(true);
            let api = api.clone();
            let user_id = user_id.clone();
            let fetch_all = fetch_all.clone();
            spawn_local(async move {
                let req = CreateLeaveRequest {
                    student_id: user_id,
                    reason: text,
                };
                match api.create_request(&req).await {
                    Ok(_) => {
                        set_notice.set(Some(Notice::success("Request submitted")));
                        set_reason.set(String::new());
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
            <div class="max-w-4xl mx-auto p-4 space-y-4">
                <AlertHost notice=notice set_notice=set_notice />

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"My Profile"</h2>
                        {move || {
                            profile
                                .get()
                                .map(|p| {
                                    view! {
                                        <p class="text-sm">
                                            {p.name} " · " {p.course} " · Year "
                                            {p.year.map(|y| y.to_string()).unwrap_or_default()}
                                            " · Sec " {p.section}
                                        </p>
                                    }
                                })
                        }}
                    </div>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"New Leave Request"</h2>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <textarea
                                class="textarea textarea-bordered"
                                placeholder="Reason for leaving campus"
                                prop:value=reason
                                on:input=move |ev| set_reason.set(event_target_value(&ev))
                            ></textarea>
                            <button
                                class="btn btn-primary self-start"
                                disabled=move || is_submitting.get()
                            >
                                "Submit Request"
                            </button>
                        </form>
                    </div>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"Today's Requests"</h2>
                        <RequestsTable
                            role=Role::Student
                            requests=Signal::derive(move || requests.get())
                            on_action=move |_| {}
                        />
                    </div>
                </div>
            </div>
        </div>
    }
    .into_any()
}
