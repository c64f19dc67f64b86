//! 请假单通用表格
//!
//! 同一张表服务所有角色：每行可用的动作由 `available_actions(role, status)`
//! 的声明式映射决定，组件本身不写死任何角色逻辑。
//! 动作点击只向父组件上抛，確认与网络调用由页面处理。

use leptos::prelude::*;

use crate::session::is_face_verified;
use facesure_shared::{LeaveRequest, RequestAction, RequestStatus, Role, available_actions};

/// 离校标记按钮的本地门控
///
/// APPROVED 状态必须先完成人脸核验（本地标记），EXIT_ALLOWED 表示
/// 服务端已经记录核验通过，直接放行。
pub fn mark_left_enabled(status: &RequestStatus, face_verified: bool) -> bool {
    match status {
        RequestStatus::ExitAllowed => true,
        RequestStatus::Approved => face_verified,
        _ => false,
    }
}

#[component]
pub fn RequestsTable(
    role: Role,
    requests: Signal<Vec<LeaveRequest>>,
    #[prop(into)] on_action: Callback<(RequestAction, LeaveRequest)>,
) -> impl IntoView {
    view! {
        <div class="overflow-x-auto">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Student"</th>
                        <th>"Reason"</th>
                        <th>"Status"</th>
                        <th>"Mentor"</th>
                        <th>"Requested"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || requests.get().is_empty()>
                        <tr>
                            <td colspan="6" class="text-center opacity-60">
                                "No requests"
                            </td>
                        </tr>
                    </Show>
                    <For
                        each=move || requests.get()
                        key=|req| req.id().to_string()
                        children=move |req: LeaveRequest| {
                            view! { <RequestRow role=role req=req on_action=on_action /> }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn RequestRow(
    role: Role,
    req: LeaveRequest,
    on_action: Callback<(RequestAction, LeaveRequest)>,
) -> impl IntoView {
    let status = req.status.clone();
    let actions = available_actions(role, &status);
    let request_id = req.id().to_string();

    let student = format!(
        "{} ({})",
        req.student_name,
        req.student_id
    );
    let mentor = req.mentor_name.clone().unwrap_or_else(|| "-".to_string());
    let requested = req.request_time.display();

    let buttons = actions
        .iter()
        .map(|action| {
            let action = *action;
            let req = req.clone();
            let disabled = action == RequestAction::MarkLeft
                && !mark_left_enabled(&req.status, is_face_verified(&request_id));
            let class = match action {
                RequestAction::MentorApprove | RequestAction::HodApprove => {
                    "btn btn-xs btn-success"
                }
                RequestAction::MentorReject | RequestAction::HodReject => "btn btn-xs btn-error",
                RequestAction::VerifyFace => "btn btn-xs btn-info",
                RequestAction::MarkLeft => "btn btn-xs btn-warning",
            };
            view! {
                <button class=class disabled=disabled on:click=move |_| {
                    on_action.run((action, req.clone()));
                }>
                    {action.verb()}
                </button>
            }
        })
        .collect_view();

    view! {
        <tr>
            <td>{student}</td>
            <td class="max-w-xs truncate">{req.reason.clone()}</td>
            <td>
                <span class=status.badge_class()>{status.label().to_string()}</span>
            </td>
            <td>{mentor}</td>
            <td>{requested}</td>
            <td>
                <div class="flex gap-1">{buttons}</div>
            </td>
        </tr>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_requires_local_verification() {
        assert!(!mark_left_enabled(&RequestStatus::Approved, false));
        assert!(mark_left_enabled(&RequestStatus::Approved, true));
    }

    #[test]
    fn exit_allowed_skips_local_marker() {
        assert!(mark_left_enabled(&RequestStatus::ExitAllowed, false));
    }

    #[test]
    fn other_statuses_never_mark_left() {
        for status in [
            RequestStatus::PendingMentor,
            RequestStatus::PendingHod,
            RequestStatus::LeftCampus,
            RequestStatus::RejectedByHod,
        ] {
            assert!(!mark_left_enabled(&status, true), "{status:?}");
        }
    }
}
