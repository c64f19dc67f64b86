//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 守卫判定本身在 route.rs 中，这里只负责执行判定结果。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardVerdict, decide};
use crate::session::{Session, now_secs};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话信号实现与认证系统的解耦；会话失效时通过
/// 回调通知外部清理存储。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 当前会话（注入的信号）
    session: Signal<Option<Session>>,
    /// 会话过期/损坏时的清理回调
    on_session_expired: Callback<()>,
}

impl RouterService {
    fn new(session: Signal<Option<Session>>, on_session_expired: Callback<()>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
            on_session_expired,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 按路由枚举导航（带参数路由用这个，避免手拼路径）
    pub fn navigate_route(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let session = self.session.get_untracked();
        let resolved = match decide(&target_route, session.as_ref(), now_secs()) {
            GuardVerdict::Allow => target_route,
            GuardVerdict::ToLogin { clear } => {
                web_sys::console::log_1(&"[Router] Access denied. Redirecting to login.".into());
                if clear {
                    self.on_session_expired.run(());
                }
                AppRoute::Login
            }
            GuardVerdict::Redirect(route) => {
                web_sys::console::log_1(
                    &format!("[Router] Redirecting to {}.", route.to_path()).into(),
                );
                route
            }
        };

        let path = resolved.to_path();
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;
        let on_session_expired = self.on_session_expired;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            let current = session.get_untracked();

            // popstate 时也执行守卫逻辑
            match decide(&target_route, current.as_ref(), now_secs()) {
                GuardVerdict::Allow => set_route.set(target_route),
                GuardVerdict::ToLogin { clear } => {
                    if clear {
                        on_session_expired.run(());
                    }
                    replace_history_state(&AppRoute::Login.to_path());
                    set_route.set(AppRoute::Login);
                }
                GuardVerdict::Redirect(route) => {
                    replace_history_state(&route.to_path());
                    set_route.set(route);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话状态变化时重新评估当前路由
    ///
    /// 登录后停留在登录页、登出后停留在受保护页，都会在这里被纠正。
    /// Effect 首次执行时也会对初始 URL 做一次守卫。
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;
        let on_session_expired = self.on_session_expired;

        Effect::new(move |_| {
            let current = session.get();
            let route = current_route.get_untracked();

            match decide(&route, current.as_ref(), now_secs()) {
                GuardVerdict::Allow => {}
                GuardVerdict::ToLogin { clear } => {
                    if clear {
                        on_session_expired.run(());
                    }
                    web_sys::console::log_1(
                        &"[Router] Session changed: redirecting to login.".into(),
                    );
                    push_history_state(&AppRoute::Login.to_path());
                    set_route.set(AppRoute::Login);
                }
                GuardVerdict::Redirect(redirect) => {
                    web_sys::console::log_1(
                        &format!("[Router] Session changed: redirecting to {}.", redirect.to_path())
                            .into(),
                    );
                    push_history_state(&redirect.to_path());
                    set_route.set(redirect);
                }
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    session: Signal<Option<Session>>,
    on_session_expired: Callback<()>,
) -> RouterService {
    let router = RouterService::new(session, on_session_expired);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Option<Session>>,
    /// 会话失效清理回调
    on_session_expired: Callback<()>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session, on_session_expired);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
