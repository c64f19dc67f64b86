//! 系主任 (HOD) 分配面板
//!
//! 选校区后拉该校区教职工，再勾选管辖的年级与课程。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::Notice;
use crate::session::{session_api, use_session};
use facesure_shared::{AssignHodRequest, COLLEGES, COURSES, FacultyProfile, YEARS};

#[component]
pub fn AssignHodPanel(set_notice: WriteSignal<Option<Notice>>) -> impl IntoView {
    let session_ctx = use_session();
    let token = session_ctx
        .session_signal()
        .get_untracked()
        .map(|s| s.token)
        .unwrap_or_default();

    let (college, set_college) = signal(String::new());
    let (faculty, set_faculty) = signal(Vec::<FacultyProfile>::new());
    let (selected_faculty, set_selected_faculty) = signal(String::new());
    let (years, set_years) = signal(Vec::<u8>::new());
    let (courses, set_courses) = signal(Vec::<String>::new());
    let (is_busy, set_is_busy) = signal(false);

    let api = session_api(&session_ctx, token);

    let on_college_change = {
        let api = api.clone();
        move |ev: leptos::web_sys::Event| {
            let value = event_target_value(&ev);
            set_college.set(value.clone());
            set_selected_faculty.set(String::new());
            set_faculty.set(Vec::new());
            if value.is_empty() {
                return;
            }
            let api = api.clone();
            spawn_local(async move {
                match api.faculty_by_college(&value).await {
                    Ok(list) => set_faculty.set(list),
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };

    let toggle_year = move |y: u8| {
        set_years.update(|list| {
            if let Some(pos) = list.iter().position(|v| *v == y) {
                list.remove(pos);
            } else {
                list.push(y);
            }
        });
    };
    let toggle_course = move |c: String| {
        set_courses.update(|list| {
            if let Some(pos) = list.iter().position(|v| v == &c) {
                list.remove(pos);
            } else {
                list.push(c);
            }
        });
    };

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let college = college.get_untracked();
            let faculty_id = selected_faculty.get_untracked();
            let years = years.get_untracked();
            let courses = courses.get_untracked();
            if college.is_empty() || faculty_id.is_empty() || years.is_empty() || courses.is_empty()
            {
                set_notice.set(Some(Notice::error(
                    "Please select college, faculty, years and courses",
                )));
                return;
            }
            set_is_busy.set(true);
            let api = api.clone();
            spawn_local(async move {
                let req = AssignHodRequest {
                    faculty_id,
                    college,
                    years,
                    courses,
                };
                match api.assign_hod(&req).await {
                    Ok(_) => {
                        set_notice.set(Some(Notice::success("HOD assigned successfully")));
                        set_selected_faculty.set(String::new());
                        set_years.set(Vec::new());
                        set_courses.set(Vec::new());
                    }
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                set_is_busy.set(false);
            });
        }
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">"Assign HOD"</h3>
                <form class="space-y-3" on:submit=on_submit>
                    <div class="grid grid-cols-2 gap-3">
                        <select class="select select-bordered" on:change=on_college_change>
                            <option value="">"Select College"</option>
                            {COLLEGES
                                .iter()
                                .map(|c| view! { <option value=*c>{*c}</option> })
                                .collect_view()}
                        </select>
                        <select
                            class="select select-bordered"
                            prop:value=selected_faculty
                            on:change=move |ev| set_selected_faculty.set(event_target_value(&ev))
                        >
                            <option value="">"Select Faculty"</option>
                            {move || {
                                faculty
                                    .get()
                                    .into_iter()
                                    .map(|f| {
                                        let id = f.id.clone().unwrap_or_default();
                                        view! {
                                            <option value=id.clone()>
                                                {format!("{} ({})", f.name, id)}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>

                    <div class="flex gap-6 flex-wrap">
                        <div>
                            <span class="text-sm font-semibold">"Years"</span>
                            <div class="flex gap-2 mt-1">
                                {YEARS
                                    .iter()
                                    .map(|y| {
                                        let y = *y;
                                        view! {
                                            <label class="label cursor-pointer gap-1">
                                                <input
                                                    type="checkbox"
                                                    class="checkbox checkbox-xs"
                                                    prop:checked=move || years.get().contains(&y)
                                                    on:change=move |_| toggle_year(y)
                                                />
                                                <span class="label-text text-xs">{y.to_string()}</span>
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </div>
                        <div>
                            <span class="text-sm font-semibold">"Courses"</span>
                            <div class="flex gap-2 mt-1">
                                {COURSES
                                    .iter()
                                    .map(|c| {
                                        let c = c.to_string();
                                        let c2 = c.clone();
                                        view! {
                                            <label class="label cursor-pointer gap-1">
                                                <input
                                                    type="checkbox"
                                                    class="checkbox checkbox-xs"
                                                    prop:checked={
                                                        let c = c.clone();
                                                        move || courses.get().contains(&c)
                                                    }
                                                    on:change=move |_| toggle_course(c2.clone())
                                                />
                                                <span class="label-text text-xs">{c}</span>
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </div>
                    </div>

                    <button class="btn btn-primary" disabled=move || is_busy.get()>
                        "Assign HOD"
                    </button>
                </form>
            </div>
        </div>
    }
}
