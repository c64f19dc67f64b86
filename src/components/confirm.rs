//! 二次确认
//!
//! 审批、拒绝、标记离校这类不可撤销动作都要先"武装"再执行。
//! 武装状态是纯数据（可在宿主机上测试），对话框组件只负责展示。

use leptos::prelude::*;

/// 待确认动作的持有者
///
/// 同一时刻最多武装一个动作，重复武装会覆盖前一个。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmState<T> {
    armed: Option<T>,
}

impl<T> ConfirmState<T> {
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// 武装一个动作，返回被覆盖的旧动作（如有）
    pub fn arm(&mut self, action: T) -> Option<T> {
        self.armed.replace(action)
    }

    /// 取消，丢弃待确认动作
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// 确认：取出动作并解除武装。未武装时返回 None。
    pub fn take(&mut self) -> Option<T> {
        self.armed.take()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed(&self) -> Option<&T> {
        self.armed.as_ref()
    }
}

/// 确认对话框
///
/// `message` 为 Some 时弹出；确认/取消通过回调交给持有
/// [`ConfirmState`] 的页面处理。
#[component]
pub fn ConfirmDialog(
    message: Signal<Option<String>>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if message.get().is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| on_cancel.run(())>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Please Confirm"</h3>
                <p class="py-4">{move || message.get().unwrap_or_default()}</p>
                <div class="modal-action">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn-primary" on:click=move |_| on_confirm.run(())>
                        "Confirm"
                    </button>
                </div>
            </div>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_drops_armed_action() {
        let mut state = ConfirmState::new();
        state.arm("approve");
        state.cancel();
        assert_eq!(state.take(), None);
        assert!(!state.is_armed());
    }

    #[test]
    fn take_fires_once() {
        let mut state = ConfirmState::new();
        state.arm(("approve", "R1"));
        assert_eq!(state.take(), Some(("approve", "R1")));
        // 第二次确认不会重复执行
        assert_eq!(state.take(), None);
    }

    #[test]
    fn armed_action_survives_failed_call() {
        let mut state = ConfirmState::new();
        state.arm("mark-left:R1");
        // 执行前只读取，不取出
        assert_eq!(state.armed().cloned(), Some("mark-left:R1"));
        // 调用失败后武装状态原样保留，可重试
        assert!(state.is_armed());
        // 重试成功才解除
        assert_eq!(state.take(), Some("mark-left:R1"));
        assert!(!state.is_armed());
    }

    #[test]
    fn rearming_replaces_previous_action() {
        let mut state = ConfirmState::new();
        assert_eq!(state.arm("reject"), None);
        assert_eq!(state.arm("approve"), Some("reject"));
        assert_eq!(state.take(), Some("approve"));
    }

    #[test]
    fn unarmed_take_is_noop() {
        let mut state: ConfirmState<&str> = ConfirmState::new();
        assert_eq!(state.take(), None);
    }
}
