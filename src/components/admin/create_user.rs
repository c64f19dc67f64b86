//! 建号面板
//!
//! 表单状态整合进 `FormState`（RwSignal 字段，Copy，方便跨组件传递）。
//! 切换账号类别时整表原子重置，避免残留上一类别的字段。
//! 校验在 [`UserDraft::to_request`] 里完成，纯函数，宿主机可测。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::Notice;
use crate::session::{session_api, use_session};
use facesure_shared::{COLLEGES, COURSES, CreateUserRequest, ManagedRole, YEARS};

/// 表单快照，校验与请求组装的输入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub college: String,
    pub year: String,
    pub course: String,
    pub section: String,
    pub years: Vec<u8>,
    pub courses: Vec<String>,
}

impl UserDraft {
    /// 校验并组装建号请求；所有校验失败都在网络调用之前返回
    pub fn to_request(
        &self,
        role: ManagedRole,
        created_by: &str,
    ) -> Result<CreateUserRequest, String> {
        let id = self.id.trim();
        if id.is_empty()
            || self.name.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.password.is_empty()
            || self.college.is_empty()
        {
            return Err("Please fill all required fields".to_string());
        }

        let mut req = CreateUserRequest {
            id: id.to_string(),
            name: self.name.trim().to_uppercase(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
            college: self.college.clone(),
            created_by: created_by.to_string(),
            ..Default::default()
        };

        match role {
            ManagedRole::Student => {
                let year: u8 = self
                    .year
                    .parse()
                    .map_err(|_| "Please select a year".to_string())?;
                if self.course.is_empty() || self.section.trim().is_empty() {
                    return Err("Course and section are required for students".to_string());
                }
                req.year = Some(year);
                req.course = Some(self.course.clone());
                req.section = Some(self.section.trim().to_uppercase());
            }
            ManagedRole::Faculty => {
                if self.years.is_empty() || self.courses.is_empty() {
                    return Err("Select at least one year and one course".to_string());
                }
                req.email = Some(self.email.trim().to_string());
                req.years = Some(self.years.clone());
                req.courses = Some(self.courses.clone());
            }
            ManagedRole::Guard | ManagedRole::Admin => {}
            ManagedRole::Hod => return Err("HOD accounts are assigned, not created".to_string()),
        }

        Ok(req)
    }
}

/// 表单状态：RwSignal 字段实现 Copy，组件间直接传值
#[derive(Clone, Copy)]
pub struct FormState {
    pub id: RwSignal<String>,
    pub name: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub college: RwSignal<String>,
    pub year: RwSignal<String>,
    pub course: RwSignal<String>,
    pub section: RwSignal<String>,
    pub years: RwSignal<Vec<u8>>,
    pub courses: RwSignal<Vec<String>>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(String::new()),
            name: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            college: RwSignal::new(String::new()),
            year: RwSignal::new(String::new()),
            course: RwSignal::new(String::new()),
            section: RwSignal::new(String::new()),
            years: RwSignal::new(Vec::new()),
            courses: RwSignal::new(Vec::new()),
        }
    }

    /// 整表重置
    pub fn reset(&self) {
        self.id.set(String::new());
        self.name.set(String::new());
        self.phone.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
        self.college.set(String::new());
        self.year.set(String::new());
        self.course.set(String::new());
        self.section.set(String::new());
        self.years.set(Vec::new());
        self.courses.set(Vec::new());
    }

    pub fn snapshot(&self) -> UserDraft {
        UserDraft {
            id: self.id.get_untracked(),
            name: self.name.get_untracked(),
            phone: self.phone.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
            college: self.college.get_untracked(),
            year: self.year.get_untracked(),
            course: self.course.get_untracked(),
            section: self.section.get_untracked(),
            years: self.years.get_untracked(),
            courses: self.courses.get_untracked(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn CreateUserPanel(set_notice: WriteSignal<Option<Notice>>) -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let actor_role = session.role;
    let actor_id = session.user_id.clone();
    let token = session.token.clone();

    let (role, set_role) = signal(Option::<ManagedRole>::None);
    let (is_submitting, set_is_submitting) = signal(false);
    let form = FormState::new();

    // 切换类别即整表重置
    Effect::new(move |_| {
        role.track();
        form.reset();
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(role) = role.get_untracked() else {
            set_notice.set(Some(Notice::error("Please select an account type")));
            return;
        };
        let req = match form.snapshot().to_request(role, &actor_id) {
            Ok(req) => req,
            Err(msg) => {
                set_notice.set(Some(Notice::error(msg)));
                return;
            }
        };
        set_is_submitting.set(true);
        let token = token.clone();
        spawn_local(async move {
            let api = session_api(&session_ctx, token);
            match api.create_user(role, &req).await {
                Ok(_) => {
                    set_notice.set(Some(Notice::success(format!(
                        "{} created successfully",
                        role.label()
                    ))));
                    form.reset();
                    set_role.set(None);
                }
                Err(msg) => set_notice.set(Some(Notice::error(msg))),
            }
            set_is_submitting.set(false);
        });
    };

    let toggle_year = move |y: u8| {
        form.years.update(|list| {
            if let Some(pos) = list.iter().position(|v| *v == y) {
                list.remove(pos);
            } else {
                list.push(y);
            }
        });
    };
    let toggle_course = move |c: String| {
        form.courses.update(|list| {
            if let Some(pos) = list.iter().position(|v| v == &c) {
                list.remove(pos);
            } else {
                list.push(c);
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">"Create User"</h3>

                <div class="flex gap-2 flex-wrap">
                    {ManagedRole::creatable_by(actor_role)
                        .iter()
                        .map(|r| {
                            let r = *r;
                            view! {
                                <button
                                    type="button"
                                    class=move || {
                                        if role.get() == Some(r) {
                                            "btn btn-sm btn-primary"
                                        } else {
                                            "btn btn-sm btn-outline"
                                        }
                                    }
                                    on:click=move |_| set_role.set(Some(r))
                                >
                                    {r.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>

                <Show when=move || role.get().is_some()>
                    <form class="space-y-3 mt-2" on:submit=on_submit.clone()>
                        <div class="grid grid-cols-2 gap-3">
                            <input
                                type="text"
                                class="input input-bordered"
                                placeholder="User ID"
                                prop:value=form.id
                                on:input=move |ev| form.id.set(event_target_value(&ev))
                            />
                            <input
                                type="text"
                                class="input input-bordered"
                                placeholder="Name"
                                prop:value=form.name
                                on:input=move |ev| {
                                    form.name.set(event_target_value(&ev).to_uppercase())
                                }
                            />
                            <input
                                type="text"
                                class="input input-bordered"
                                placeholder="Phone"
                                prop:value=form.phone
                                on:input=move |ev| form.phone.set(event_target_value(&ev))
                            />
                            <input
                                type="password"
                                class="input input-bordered"
                                placeholder="Password"
                                prop:value=form.password
                                on:input=move |ev| form.password.set(event_target_value(&ev))
                            />
                            <select
                                class="select select-bordered"
                                prop:value=form.college
                                on:change=move |ev| form.college.set(event_target_value(&ev))
                            >
                                <option value="">"Select College"</option>
                                {COLLEGES
                                    .iter()
                                    .map(|c| view! { <option value=*c>{*c}</option> })
                                    .collect_view()}
                            </select>
                        </div>

                        <Show when=move || role.get() == Some(ManagedRole::Student)>
                            <div class="grid grid-cols-3 gap-3">
                                <select
                                    class="select select-bordered"
                                    prop:value=form.year
                                    on:change=move |ev| form.year.set(event_target_value(&ev))
                                >
                                    <option value="">"Year"</option>
                                    {YEARS
                                        .iter()
                                        .map(|y| {
                                            view! {
                                                <option value=y.to_string()>{y.to_string()}</option>
                                            }
                                        })
                                        .collect_view()}
                                </select>
                                <select
                                    class="select select-bordered"
                                    prop:value=form.course
                                    on:change=move |ev| form.course.set(event_target_value(&ev))
                                >
                                    <option value="">"Course"</option>
                                    {COURSES
                                        .iter()
                                        .map(|c| view! { <option value=*c>{*c}</option> })
                                        .collect_view()}
                                </select>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    placeholder="Section"
                                    prop:value=form.section
                                    on:input=move |ev| {
                                        form.section.set(event_target_value(&ev).to_uppercase())
                                    }
                                />
                            </div>
                        </Show>

                        <Show when=move || role.get() == Some(ManagedRole::Faculty)>
                            <input
                                type="email"
                                class="input input-bordered w-full"
                                placeholder="Email"
                                prop:value=form.email
                                on:input=move |ev| form.email.set(event_target_value(&ev))
                            />
                            <div class="flex gap-4 flex-wrap">
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
                                                            prop:checked=move || {
                                                                form.years.get().contains(&y)
                                                            }
                                                            on:change=move |_| toggle_year(y)
                                                        />
                                                        <span class="label-text text-xs">
                                                            {y.to_string()}
                                                        </span>
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
                                                                move || form.courses.get().contains(&c)
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
                        </Show>

                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            "Create"
                        </button>
                    </form>
                </Show>
            </div>
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_draft() -> UserDraft {
        UserDraft {
            id: "2455E1C001".into(),
            name: "ravi".into(),
            phone: "9000000000".into(),
            password: "secret".into(),
            college: "KMIT".into(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_required_field_blocks_before_network() {
        let mut draft = base_draft();
        draft.phone = String::new();
        assert!(draft.to_request(ManagedRole::Guard, "25A001").is_err());
    }

    #[test]
    fn student_requires_year_course_section() {
        let draft = base_draft();
        assert!(draft.to_request(ManagedRole::Student, "25A001").is_err());

        let mut draft = base_draft();
        draft.year = "2".into();
        draft.course = "CSE".into();
        draft.section = "b".into();
        let req = draft.to_request(ManagedRole::Student, "25A001").unwrap();
        assert_eq!(req.year, Some(2));
        assert_eq!(req.section.as_deref(), Some("B"));
        assert_eq!(req.name, "RAVI");
        assert_eq!(req.created_by, "25A001");
    }

    #[test]
    fn faculty_requires_scope() {
        let mut draft = base_draft();
        draft.years = vec![1, 2];
        assert!(draft.to_request(ManagedRole::Faculty, "25A001").is_err());

        draft.courses = vec!["CSE".into()];
        let req = draft.to_request(ManagedRole::Faculty, "25A001").unwrap();
        assert_eq!(req.years, Some(vec![1, 2]));
        assert_eq!(req.course, None);
    }

    #[test]
    fn role_switch_reset_clears_every_field() {
        let form = FormState::new();
        form.id.set("2455E1C001".into());
        form.password.set("secret".into());
        form.years.set(vec![1, 2]);
        form.courses.set(vec!["CSE".into()]);
        form.reset();
        assert_eq!(form.snapshot(), UserDraft::default());
    }

    #[test]
    fn guard_and_admin_carry_no_role_fields() {
        let draft = base_draft();
        let req = draft.to_request(ManagedRole::Admin, "26S001").unwrap();
        assert_eq!(req.year, None);
        assert_eq!(req.years, None);
        assert_eq!(req.email, None);
    }
}
