use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{API_BASE, FaceSureApi};
use crate::session::{session_from_login, use_session};

#[component]
pub fn LoginPage() -> impl IntoView {
    let session_ctx = use_session();

    let (user_id, set_user_id) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if user_id.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = FaceSureApi::new(API_BASE.to_string());
            let result = api
                .login(user_id.get_untracked().trim().to_string(), password.get_untracked())
                .await
                .and_then(|login| session_from_login(&login));
            match result {
                Ok(session) => {
                    // 守卫 Effect 在会话写入后负责跳到角色落地页
                    session_ctx.set_session(session);
                }
                Err(msg) => set_error_msg.set(Some(msg)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"FaceSure"</h1>
                    <p class="text-base-content/70">"Campus gate-pass portal"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="user_id">
                                <span class="label-text">"User ID"</span>
                            </label>
                            <input
                                id="user_id"
                                type="text"
                                placeholder="2455E1C001"
                                on:input=move |ev| set_user_id.set(event_target_value(&ev))
                                prop:value=user_id
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Signing in..."
                                        }
                                            .into_any()
                                    } else {
                                        "Sign In".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
