//! 删号面板
//!
//! 两段式：先按 ID 查到账号并显示姓名，确认后才执行删除。
//! ADMIN 操作员不可删管理员账号，这只是界面提示，服务端仍会校验。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::Notice;
use crate::components::confirm::{ConfirmDialog, ConfirmState};
use crate::session::{session_api, use_session};
use facesure_shared::ManagedRole;

#[derive(Clone, PartialEq, Eq)]
struct DeleteTarget {
    role: ManagedRole,
    id: String,
    name: String,
}

fn display_name(user: &serde_json::Value) -> Option<String> {
    user.get("name")
        .or_else(|| user.get("username"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[component]
pub fn DeleteUserPanel(set_notice: WriteSignal<Option<Notice>>) -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let actor_role = session.role;
    let token = session.token.clone();

    let (role, set_role) = signal(Option::<ManagedRole>::None);
    let (user_id, set_user_id) = signal(String::new());
    let (is_busy, set_is_busy) = signal(false);
    let confirm = RwSignal::new(ConfirmState::<DeleteTarget>::new());

    let api = session_api(&session_ctx, token);

    let lookup = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(role) = role.get_untracked() else {
                set_notice.set(Some(Notice::error("Please select a role")));
                return;
            };
            let id = user_id.get_untracked().trim().to_string();
            if id.is_empty() {
                set_notice.set(Some(Notice::error("Please enter a user ID")));
                return;
            }
            if !role.may_delete(actor_role) {
                set_notice.set(Some(Notice::error(
                    "Admins cannot delete Admin or Super Admin accounts",
                )));
                return;
            }
            set_is_busy.set(true);
            let api = api.clone();
            spawn_local(async move {
                match api.fetch_user(role, &id).await {
                    Ok(user) => match display_name(&user) {
                        Some(name) => {
                            confirm.update(|c| {
                                c.arm(DeleteTarget { role, id, name });
                            });
                        }
                        None => {
                            set_notice.set(Some(Notice::error(format!(
                                "User {id} found but name not retrievable"
                            ))));
                        }
                    },
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
                set_is_busy.set(false);
            });
        }
    };

    let confirm_message = Signal::derive(move || {
        confirm.with(|c| {
            c.armed().map(|t| {
                format!("Delete {} {} ({})?", t.role.label(), t.name, t.id)
            })
        })
    });

    let run_delete = {
        let api = api.clone();
        move |_| {
            // 失败时保留武装状态，对话框不关，用户可重试或取消
            let Some(target) = confirm.with_untracked(|c| c.armed().cloned()) else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                match api.delete_user(target.role, &target.id).await {
                    Ok(_) => {
                        confirm.update(|c| {
                            c.take();
                        });
                        set_notice.set(Some(Notice::success(format!(
                            "{}: {} deleted successfully",
                            target.role.label(),
                            target.name.to_uppercase(),
                        ))));
                        set_user_id.set(String::new());
                    }
                    Err(msg) => set_notice.set(Some(Notice::error(msg))),
                }
            });
        }
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">"Delete User"</h3>
                <form class="flex flex-col gap-3" on:submit=lookup>
                    <select
                        class="select select-bordered"
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            set_role
                                .set(
                                    ManagedRole::deletable_by(actor_role)
                                        .iter()
                                        .copied()
                                        .find(|r| r.label() == value),
                                );
                        }
                    >
                        <option value="">"Select Role"</option>
                        {ManagedRole::deletable_by(actor_role)
                            .iter()
                            .map(|r| view! { <option value=r.label()>{r.label()}</option> })
                            .collect_view()}
                    </select>
                    <input
                        type="text"
                        class="input input-bordered"
                        placeholder="User ID"
                        prop:value=user_id
                        on:input=move |ev| set_user_id.set(event_target_value(&ev))
                    />
                    <button class="btn btn-error self-start" disabled=move || is_busy.get()>
                        "Find & Delete"
                    </button>
                </form>
            </div>
        </div>

        <ConfirmDialog
            message=confirm_message
            on_confirm=run_delete
            on_cancel=move |_| confirm.update(|c| c.cancel())
        />
    }
    .into_any()
}
