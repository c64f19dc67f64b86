//! HOD 面板：待审请假单 + 导师分配
//!
//! 审批走二次确认；导师分配按 (course, year, section) 定位一个桶，
//! 每桶恰好两名导师，与本系主任管辖范围重叠的教职工不可入选。

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;

use crate::components::alert::{AlertHost, Notice};
use crate::components::confirm::{ConfirmDialog, ConfirmState};
use crate::components::navbar::Navbar;
use crate::components::requests_table::RequestsTable;
use crate::session::{session_api, use_session};
use facesure_shared::{
    AssignMentorsRequest, FacultyProfile, HodDecision, LeaveRequest, MentorAssignment,
    MENTORS_PER_SECTION, RequestAction, Role, YEARS,
};

/// mentor_id -> 已有分配的展示行
fn assignment_index(mappings: &[MentorAssignment]) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for m in mappings {
        map.entry(m.mentor_id.clone())
            .or_default()
            .push(m.scope_label());
    }
    map
}

#[component]
pub fn HodDashboard() -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let user_id = session.user_id.clone();
    let token = session.token.clone();

    let (profile, set_profile) = signal(Option::<FacultyProfile>::None);
    let (requests, set_requests) = signal(Vec::<LeaveRequest>::new());
    let (notice, set_notice) = signal(Option::<Notice>::None);
    let confirm = RwSignal::new(ConfirmState::<(RequestAction, LeaveRequest)>::new());

    let api = session_api(&session_ctx, token);

    let fetch_requests = {
        let api = api.clone();
        let user_id = user_id.clone();
        move || {
            let api = api.clone();
            let user_id = user_id.clone();
            spawn_local(async move {
                match api.hod_pending(&user_id).await {
                    Ok(list) => set_requests.set(list),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };
    {
        let api = api.clone();
        let user_id = user_id.clone();
        let fetch_requests = fetch_requests.clone();
        spawn_local(async move {
            match api.faculty(&user_id).await {
                Ok(p) => set_profile.set(Some(p)),
                Err(msg) => set_notice.set(Some(Notice::error(msg))),
            }
            fetch_requests();
        });
    }

    let arm = move |(action, request): (RequestAction, LeaveRequest)| {
        confirm.update(|c| {
            c.arm((action, request));
        });
    };

    let confirm_message = Signal::derive(move || {
        confirm.with(|c| {
            c.armed().map(|(action, req)| {
                format!(
                    "{} request from {} ({})?",
                    action.verb(),
                    req.student_name,
                    req.student_id,
                )
            })
        })
    });

    let run_armed = {
        let api = api.clone();
        let user_id = user_id.clone();
        let fetch_requests = fetch_requests.clone();
        move |_| {
            // 失败时保留武装状态，对话框不关，用户可重试或取消
            let Some((action, request)) = confirm.with_untracked(|c| c.armed().cloned()) else {
                return;
            };
            let hod_name = profile.get_untracked().map(|p| p.name).unwrap_or_default();
            let api = api.clone();
            let user_id = user_id.clone();
            let fetch_requests = fetch_requests.clone();
            spawn_local(async move {
                let decision = HodDecision {
                    hod_id: user_id,
                    hod_name,
                };
                let request_id = request.id().to_string();
                let result = match action {
                    RequestAction::HodApprove => api.hod_approve(&request_id, &decision).await,
                    RequestAction::HodReject => api.hod_reject(&request_id, &decision).await,
                    _ => return,
                };
                match result {
                    Ok(_) => {
                        confirm.update(|c| {
                            c.take();
                        });
                        set_notice.set(Some(Notice::success(match action {
                            RequestAction::HodApprove => "Request approved",
                            _ => "Request rejected",
                        })));
                        fetch_requests();
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
                    "HOD Dashboard"
                    {move || profile.get().map(|p| format!(" · {}", p.name))}
                </h2>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h3 class="card-title">"Pending Requests"</h3>
                        <RequestsTable
                            role=Role::Hod
                            requests=Signal::derive(move || requests.get())
                            on_action=arm
                        />
                    </div>
                </div>

                {move || {
                    profile
                        .get()
                        .map(|p| {
                            view! { <MentorAssignmentPanel hod=p set_notice=set_notice /> }
                        })
                }}
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

/// 导师分配面板
#[component]
fn MentorAssignmentPanel(
    hod: FacultyProfile,
    set_notice: WriteSignal<Option<Notice>>,
) -> impl IntoView {
    let session_ctx = use_session();
    let token = session_ctx
        .session_signal()
        .get_untracked()
        .map(|s| s.token)
        .unwrap_or_default();
    let api = session_api(&session_ctx, token);

    let (faculty, set_faculty) = signal(Vec::<FacultyProfile>::new());
    let (assignments, set_assignments) = signal(HashMap::<String, Vec<String>>::new());
    let (course, set_course) = signal(String::new());
    let (year, set_year) = signal(String::new());
    let (section, set_section) = signal(String::new());
    let (selected, set_selected) = signal(Vec::<String>::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let hod_for_filter = hod.clone();
    let hod_id = hod.id.clone().unwrap_or_default();
    let college = hod.college.clone();

    let fetch_panel = {
        let api = api.clone();
        let college = college.clone();
        move || {
            let api = api.clone();
            let college = college.clone();
            spawn_local(async move {
                match api.faculty_by_college(&college).await {
                    Ok(list) => set_faculty.set(list),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                match api.mentor_mappings().await {
                    Ok(mappings) => set_assignments.set(assignment_index(&mappings)),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };
    fetch_panel();

    let toggle = move |mentor_id: String| {
        set_selected.update(|sel| {
            if let Some(pos) = sel.iter().position(|id| id == &mentor_id) {
                sel.remove(pos);
            } else if sel.len() < MENTORS_PER_SECTION {
                sel.push(mentor_id);
            } else {
                set_notice.set(Some(Notice::error(format!(
                    "Select exactly {MENTORS_PER_SECTION} mentors"
                ))));
            }
        });
    };

    let on_submit = {
        let api = api.clone();
        let college = college.clone();
        let fetch_panel = fetch_panel.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let course = course.get_untracked();
            let year_str = year.get_untracked();
            let section = section.get_untracked().trim().to_uppercase();
            if course.is_empty() || year_str.is_empty() || section.is_empty() {
                set_notice.set(Some(Notice::error("Please fill all fields")));
                return;
            }
            let Ok(year_num) = year_str.parse::<u8>() else {
                set_notice.set(Some(Notice::error("Invalid year")));
                return;
            };
            let mentor_ids = selected.get_untracked();
            if mentor_ids.len() != MENTORS_PER_SECTION {
                set_notice.set(Some(Notice::error(format!(
                    "Select exactly {MENTORS_PER_SECTION} mentors"
                ))));
                return;
            }
            set_is_submitting.set(true);
            let api = api.clone();
            let college = college.clone();
            let fetch_panel = fetch_panel.clone();
            spawn_local(async move {
                let req = AssignMentorsRequest {
                    college,
                    course,
                    year: year_num,
                    section,
                    mentor_ids,
                };
                match api.assign_mentors(&req).await {
                    Ok(_) => {
                        set_notice.set(Some(Notice::success("Mentors assigned")));
                        set_selected.set(Vec::new());
                        fetch_panel();
                    }
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                set_is_submitting.set(false);
            });
        }
    };

    let hod_courses = hod.courses.clone();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">"Mentor Assignment"</h3>
                <form class="space-y-4" on:submit=on_submit>
                    <div class="grid grid-cols-3 gap-4">
                        <select
                            class="select select-bordered"
                            prop:value=course
                            on:change=move |ev| set_course.set(event_target_value(&ev))
                        >
                            <option value="">"Select Course"</option>
                            {hod_courses
                                .iter()
                                .map(|c| {
                                    let c = c.clone();
                                    view! { <option value=c.clone()>{c.clone()}</option> }
                                })
                                .collect_view()}
                        </select>
                        <select
                            class="select select-bordered"
                            prop:value=year
                            on:change=move |ev| set_year.set(event_target_value(&ev))
                        >
                            <option value="">"Select Year"</option>
                            {YEARS
                                .iter()
                                .map(|y| {
                                    view! {
                                        <option value=y.to_string()>{format!("Year {y}")}</option>
                                    }
                                })
                                .collect_view()}
                        </select>
                        <input
                            type="text"
                            class="input input-bordered"
                            placeholder="Section"
                            prop:value=section
                            on:input=move |ev| set_section.set(event_target_value(&ev))
                        />
                    </div>

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                        {move || {
                            let hod = hod_for_filter.clone();
                            let hod_id = hod_id.clone();
                            let index = assignments.get();
                            faculty
                                .get()
                                .into_iter()
                                .filter(|m| m.id.as_deref() != Some(hod_id.as_str()))
                                .map(|m| {
                                    let mentor_id = m.id.clone().unwrap_or_default();
                                    let disabled = !m.is_mentor_candidate(&hod);
                                    let checked = {
                                        let mentor_id = mentor_id.clone();
                                        move || selected.get().contains(&mentor_id)
                                    };
                                    let existing = index.get(&mentor_id).cloned();
                                    let scope_note = if disabled {
                                        Some(format!(
                                            "Assigned as HOD for years {:?}, {}",
                                            m.years,
                                            m.courses.join(", "),
                                        ))
                                    } else {
                                        existing
                                            .map(|list| format!("Mentor for: {}", list.join(" | ")))
                                    };
                                    let on_toggle = {
                                        let mentor_id = mentor_id.clone();
                                        move |_| {
                                            if !disabled {
                                                toggle(mentor_id.clone());
                                            }
                                        }
                                    };
                                    view! {
                                        <label class=move || {
                                            if disabled {
                                                "flex items-start gap-3 p-3 rounded border opacity-60"
                                            } else {
                                                "flex items-start gap-3 p-3 rounded border cursor-pointer"
                                            }
                                        }>
                                            <input
                                                type="checkbox"
                                                class="checkbox checkbox-sm mt-1"
                                                disabled=disabled
                                                prop:checked=checked
                                                on:change=on_toggle
                                            />
                                            <div>
                                                <div class="font-semibold text-sm">
                                                    {format!("{} ({})", m.name, mentor_id)}
                                                </div>
                                                {scope_note
                                                    .map(|note| {
                                                        view! {
                                                            <div class="text-xs opacity-70 mt-1">{note}</div>
                                                        }
                                                    })}
                                            </div>
                                        </label>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>

                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        "Assign Mentors"
                    </button>
                </form>
            </div>
        </div>
    }
}
