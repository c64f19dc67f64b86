//! 学生历史记录
//!
//! 按学期分组展示：学期号大的在前（最近的学期先看），缺学期号的
//! 归入 "Unknown Semester" 放在最后，组内按申请时间倒序。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert::{AlertHost, Notice};
use crate::components::navbar::Navbar;
use crate::session::{session_api, use_session};
use facesure_shared::LeaveRequest;

pub const UNKNOWN_SEMESTER: &str = "Unknown Semester";

/// 分组标题
pub fn semester_label(semester: Option<u8>) -> String {
    match semester {
        Some(n) => format!("Semester {n}"),
        None => UNKNOWN_SEMESTER.to_string(),
    }
}

/// 将历史记录按学期分组排序
pub fn group_by_semester(mut requests: Vec<LeaveRequest>) -> Vec<(String, Vec<LeaveRequest>)> {
    requests.sort_by_key(|r| std::cmp::Reverse(r.request_time.sort_key()));

    let mut known: Vec<(u8, Vec<LeaveRequest>)> = Vec::new();
    let mut unknown: Vec<LeaveRequest> = Vec::new();

    for req in requests {
        match req.semester {
            Some(sem) => match known.iter_mut().find(|(s, _)| *s == sem) {
                Some((_, bucket)) => bucket.push(req),
                None => known.push((sem, vec![req])),
            },
            None => unknown.push(req),
        }
    }

    known.sort_by(|(a, _), (b, _)| b.cmp(a));

    let mut groups: Vec<(String, Vec<LeaveRequest>)> = known
        .into_iter()
        .map(|(sem, bucket)| (semester_label(Some(sem)), bucket))
        .collect();
    if !unknown.is_empty() {
        groups.push((UNKNOWN_SEMESTER.to_string(), unknown));
    }
    groups
}

/// 分组渲染键：桶里换了哪条记录（即使条数没变）都要重建该组
fn bucket_key(label: &str, bucket: &[LeaveRequest]) -> String {
    let mut key = label.to_string();
    for req in bucket {
        key.push('|');
        key.push_str(req.id());
    }
    key
}

#[component]
pub fn StudentHistory() -> impl IntoView {
    let session_ctx = use_session();
    let Some(session) = session_ctx.session_signal().get_untracked() else {
        return ().into_any();
    };
    let user_id = session.user_id.clone();
    let token = session.token.clone();

    let (groups, set_groups) = signal(Vec::<(String, Vec<LeaveRequest>)>::new());
    let (notice, set_notice) = signal(Option::<Notice>::None);

    spawn_local(async move {
        let api = session_api(&session_ctx, token);
        match api.student_history(&user_id).await {
            Ok(list) => set_groups.set(group_by_semester(list)),
            Err(msg) => set_notice.set(Some(Notice::error(msg))),
        }
    });

    view! {
        <div class="min-h-screen bg-base-200">
            <Navbar />
            <div class="max-w-4xl mx-auto p-4 space-y-4">
                <AlertHost notice=notice set_notice=set_notice />
                <h2 class="text-2xl font-bold">"Request History"</h2>

                <Show when=move || groups.get().is_empty()>
                    <p class="opacity-60">"No past requests"</p>
                </Show>

                <For
                    each=move || groups.get()
                    key=|(label, bucket)| bucket_key(label, bucket)
                    children=|(label, bucket)| {
                        view! {
                            <div class="card bg-base-100 shadow">
                                <div class="card-body">
                                    <h3 class="card-title text-lg">{label}</h3>
                                    <table class="table table-sm w-full">
                                        <thead>
                                            <tr>
                                                <th>"Reason"</th>
                                                <th>"Status"</th>
                                                <th>"Requested"</th>
                                                <th>"Exit"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {bucket
                                                .into_iter()
                                                .map(|req| {
                                                    let exit = req
                                                        .exit_mark_time
                                                        .as_ref()
                                                        .map(|t| t.display())
                                                        .unwrap_or_else(|| "-".to_string());
                                                    view! {
                                                        <tr>
                                                            <td class="max-w-xs truncate">
                                                                {req.reason.clone()}
                                                            </td>
                                                            <td>
                                                                <span class=req.status.badge_class()>
                                                                    {req.status.label().to_string()}
                                                                </span>
                                                            </td>
                                                            <td>{req.request_time.display()}</td>
                                                            <td>{exit}</td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use facesure_shared::RequestStatus;

    fn req(semester: Option<u8>, time: &str, reason: &str) -> LeaveRequest {
        let json = serde_json::json!({
            "request_id": reason,
            "student_id": "2455E1C001",
            "reason": reason,
            "status": "PENDING_MENTOR",
            "semester": semester,
            "request_time": time,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn semesters_sort_descending_numerically() {
        let groups = group_by_semester(vec![
            req(Some(2), "2026-01-10T10:00:00Z", "a"),
            req(Some(10), "2026-01-11T10:00:00Z", "b"),
            req(Some(9), "2026-01-12T10:00:00Z", "c"),
        ]);
        let labels: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        // 数值序，不是字典序（10 在 9 前面）
        assert_eq!(labels, vec!["Semester 10", "Semester 9", "Semester 2"]);
    }

    #[test]
    fn unknown_semester_goes_last() {
        let groups = group_by_semester(vec![
            req(None, "2026-03-01T10:00:00Z", "x"),
            req(Some(1), "2026-01-01T10:00:00Z", "y"),
        ]);
        assert_eq!(groups.last().unwrap().0, UNKNOWN_SEMESTER);
        assert_eq!(groups[0].0, "Semester 1");
    }

    #[test]
    fn entries_within_group_newest_first() {
        let groups = group_by_semester(vec![
            req(Some(3), "2026-01-01T08:00:00Z", "old"),
            req(Some(3), "2026-02-01T08:00:00Z", "new"),
            req(Some(3), "2026-01-15T08:00:00Z", "mid"),
        ]);
        let reasons: Vec<&str> = groups[0].1.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(reasons, vec!["new", "mid", "old"]);
        assert_eq!(groups[0].1[0].status, RequestStatus::PendingMentor);
    }

    #[test]
    fn empty_history_yields_no_groups() {
        assert!(group_by_semester(Vec::new()).is_empty());
    }

    #[test]
    fn bucket_key_tracks_contents_not_just_length() {
        let a = vec![req(Some(3), "2026-01-01T08:00:00Z", "r1")];
        let b = vec![req(Some(3), "2026-01-01T08:00:00Z", "r2")];
        assert_eq!(a.len(), b.len());
        assert_ne!(bucket_key("Semester 3", &a), bucket_key("Semester 3", &b));
        assert_eq!(bucket_key("Semester 3", &a), bucket_key("Semester 3", &a));
    }
}
