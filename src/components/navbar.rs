//! 顶部导航栏
//!
//! 链接集合由会话角色决定，登出按钮清会话后由路由服务送回登录页。

use leptos::prelude::*;

use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use facesure_shared::Role;

fn links_for(role: Role) -> &'static [(&'static str, AppRoute)] {
    match role {
        Role::Student => &[
            ("Dashboard", AppRoute::Student),
            ("History", AppRoute::StudentHistory),
        ],
        Role::Mentor => &[("Dashboard", AppRoute::Mentor)],
        Role::Hod => &[("Dashboard", AppRoute::Hod)],
        Role::Guard => &[("Dashboard", AppRoute::Guard)],
        Role::Admin | Role::SuperAdmin => &[("Dashboard", AppRoute::SuperAdmin)],
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let session_ctx = use_session();
    let session = session_ctx.session_signal();
    let router = use_router();

    let logout = move |_| {
        // 清会话即可，守卫 Effect 会把受保护页面送回登录页
        session_ctx.clear_session();
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1 flex items-center gap-6">
                <span class="text-xl font-bold">"FaceSure"</span>
                {move || {
                    session
                        .get()
                        .map(|s| {
                            links_for(s.role)
                                .iter()
                                .map(|(label, route)| {
                                    let route = route.clone();
                                    let href = route.to_path();
                                    view! {
                                        <a
                                            class="link link-hover text-sm"
                                            href=href
                                            on:click=move |ev: leptos::web_sys::MouseEvent| {
                                                ev.prevent_default();
                                                router.navigate_route(route.clone());
                                            }
                                        >
                                            {*label}
                                        </a>
                                    }
                                })
                                .collect_view()
                        })
                }}
            </div>
            <div class="flex-none flex items-center gap-3">
                {move || {
                    session
                        .get()
                        .map(|s| view! { <span class="text-sm opacity-70">{s.user_id}</span> })
                }}
                <button class="btn btn-sm btn-outline" on:click=logout>
                    "Logout"
                </button>
            </div>
        </div>
    }
}
