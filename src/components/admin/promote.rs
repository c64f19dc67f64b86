//! 批量升级学年
//!
//! 按入学年份 + 校区整批推进，结果里带成功数与逐条失败信息。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::Notice;
use crate::session::{session_api, use_session};
use facesure_shared::{COLLEGES, PromoteStudentsRequest, PromoteStudentsResult};

#[component]
pub fn PromoteStudentsPanel(set_notice: WriteSignal<Option<Notice>>) -> impl IntoView {
    let session_ctx = use_session();
    let token = session_ctx
        .session_signal()
        .get_untracked()
        .map(|s| s.token)
        .unwrap_or_default();

    let (admission_year, set_admission_year) = signal(String::new());
    let (college, set_college) = signal(COLLEGES[0].to_string());
    let (result, set_result) = signal(Option::<PromoteStudentsResult>::None);
    let (is_busy, set_is_busy) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Ok(year) = admission_year.get_untracked().parse::<i32>() else {
            set_notice.set(Some(Notice::error("Please select an admission year")));
            return;
        };
        set_is_busy.set(true);
        set_result.set(None);
        let token = token.clone();
        spawn_local(async move {
            let api = session_api(&session_ctx, token);
            let req = PromoteStudentsRequest {
                admission_year: year,
                college: college.get_untracked(),
            };
            match api.promote_students(&req).await {
                Ok(outcome) => {
                    set_notice.set(Some(Notice::success(format!(
                        "Promoted {} students",
                        outcome.promoted_count
                    ))));
                    set_result.set(Some(outcome));
                    set_admission_year.set(String::new());
                }
                Err(msg) => set_notice.set(Some(Notice::error(msg))),
            }
            set_is_busy.set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">"Promote Students"</h3>
                <form class="flex gap-3 items-end flex-wrap" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="admission_year">
                            <span class="label-text">"Admission Year"</span>
                        </label>
                        <input
                            id="admission_year"
                            type="number"
                            class="input input-bordered"
                            placeholder="2024"
                            prop:value=admission_year
                            on:input=move |ev| set_admission_year.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="promote_college">
                            <span class="label-text">"College"</span>
                        </label>
                        <select
                            id="promote_college"
                            class="select select-bordered"
                            prop:value=college
                            on:change=move |ev| set_college.set(event_target_value(&ev))
                        >
                            {COLLEGES
                                .iter()
                                .map(|c| view! { <option value=*c>{*c}</option> })
                                .collect_view()}
                        </select>
                    </div>
                    <button class="btn btn-primary" disabled=move || is_busy.get()>
                        "Promote"
                    </button>
                </form>

                {move || {
                    result
                        .get()
                        .filter(|r| !r.errors.is_empty())
                        .map(|r| {
                            view! {
                                <div class="mt-3">
                                    <p class="text-sm font-semibold text-error">
                                        "Some students could not be promoted:"
                                    </p>
                                    <ul class="list-disc list-inside text-sm opacity-80">
                                        {r
                                            .errors
                                            .into_iter()
                                            .map(|e| view! { <li>{e}</li> })
                                            .collect_view()}
                                    </ul>
                                </div>
                            }
                        })
                }}
            </div>
        </div>
    }
}
