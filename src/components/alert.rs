//! 页面内通知条
//!
//! 成功/失败提示共用一条 signal，新通知覆盖旧通知，
//! 成功类通知在 2.5s 后自动消失。

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// 通知显示组件
///
/// 错误通知常驻（等待用户下一步操作覆盖），成功通知自动消失。
#[component]
pub fn AlertHost(
    notice: ReadSignal<Option<Notice>>,
    set_notice: WriteSignal<Option<Notice>>,
) -> impl IntoView {
    Effect::new(move |_| {
        if let Some(n) = notice.get() {
            if n.kind == NoticeKind::Success {
                Timeout::new(2500, move || {
                    // 只清除仍然挂着的同一条通知
                    if notice.get_untracked().as_ref() == Some(&n) {
                        set_notice.set(None);
                    }
                })
                .forget();
            }
        }
    });

    view! {
        {move || {
            notice
                .get()
                .map(|n| {
                    let class = match n.kind {
                        NoticeKind::Success => "alert alert-success text-sm py-2",
                        NoticeKind::Error => "alert alert-error text-sm py-2",
                    };
                    view! {
                        <div role="alert" class=class>
                            <span>{n.text.clone()}</span>
                        </div>
                    }
                })
        }}
    }
}
