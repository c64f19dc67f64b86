//! FaceSure 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫判定（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话状态管理
//! - `api`: 后端客户端
//! - `components`: UI 组件层

mod api;
mod components {
    pub mod alert;
    pub mod camera;
    pub mod confirm;
    pub mod guard;
    pub mod history;
    pub mod hod;
    pub mod login;
    pub mod mentor;
    pub mod navbar;
    pub mod register_face;
    pub mod requests_table;
    pub mod student;
    pub mod verify_face;

    pub mod admin {
        pub mod assign_hod;
        pub mod create_user;
        pub mod dashboard;
        pub mod delete_user;
        pub mod promote;
    }
}
mod session;

use leptos::prelude::*;

pub(crate) mod web {
    pub mod route;
    pub mod router;
}

use crate::components::admin::dashboard::SuperAdminDashboard;
use crate::components::guard::GuardDashboard;
use crate::components::history::StudentHistory;
use crate::components::hod::HodDashboard;
use crate::components::login::LoginPage;
use crate::components::mentor::MentorDashboard;
use crate::components::register_face::RegisterFacePage;
use crate::components::student::StudentDashboard;
use crate::components::verify_face::VerifyFacePage;
use crate::session::{SessionContext, restore_session};

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。守卫在路由服务里已经跑过，
/// 这里只管渲染。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Student => view! { <StudentDashboard /> }.into_any(),
        AppRoute::StudentHistory => view! { <StudentHistory /> }.into_any(),
        AppRoute::RegisterFace => view! { <RegisterFacePage /> }.into_any(),
        AppRoute::Mentor => view! { <MentorDashboard /> }.into_any(),
        AppRoute::Hod => view! { <HodDashboard /> }.into_any(),
        AppRoute::Guard => view! { <GuardDashboard /> }.into_any(),
        AppRoute::GuardVerifyFace {
            student_id,
            request_id,
        } => view! { <VerifyFacePage student_id=student_id request_id=request_id /> }.into_any(),
        AppRoute::SuperAdmin => view! { <SuperAdminDashboard /> }.into_any(),
        AppRoute::SuperAdminAction(action) => {
            view! { <SuperAdminDashboard action=action /> }.into_any()
        }
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文并从 LocalStorage 恢复
    let session_ctx = SessionContext::new();
    provide_context(session_ctx);
    restore_session(&session_ctx);

    // 2. 会话信号注入路由服务（解耦），过期时由路由回调清理
    let session = session_ctx.session_signal();
    let on_session_expired = Callback::new(move |()| session_ctx.clear_session());

    view! {
        <Router session=session on_session_expired=on_session_expired>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
