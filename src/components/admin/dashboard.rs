//! super-admin 区域：标签页布局 + 按路由分发具体面板

use leptos::prelude::*;

use crate::components::admin::assign_hod::AssignHodPanel;
use crate::components::admin::create_user::CreateUserPanel;
use crate::components::admin::delete_user::DeleteUserPanel;
use crate::components::admin::promote::PromoteStudentsPanel;
use crate::components::alert::{AlertHost, Notice};
use crate::components::navbar::Navbar;
use crate::web::route::{AdminAction, AppRoute};
use crate::web::router::use_router;

const TABS: &[(&str, AdminAction)] = &[
    ("Create User", AdminAction::CreateUser),
    ("Delete User", AdminAction::DeleteUser),
    ("Promote Students", AdminAction::Promote),
    ("Assign HOD", AdminAction::AssignHod),
];

#[component]
pub fn SuperAdminDashboard(#[prop(optional)] action: Option<AdminAction>) -> impl IntoView {
    let router = use_router();
    let (notice, set_notice) = signal(Option::<Notice>::None);

    let panel = match action {
        Some(AdminAction::CreateUser) => {
            view! { <CreateUserPanel set_notice=set_notice /> }.into_any()
        }
        Some(AdminAction::DeleteUser) => {
            view! { <DeleteUserPanel set_notice=set_notice /> }.into_any()
        }
        Some(AdminAction::Promote) => {
            view! { <PromoteStudentsPanel set_notice=set_notice /> }.into_any()
        }
        Some(AdminAction::AssignHod) => {
            view! { <AssignHodPanel set_notice=set_notice /> }.into_any()
        }
        None => view! {
            <p class="opacity-70">"Select an administration task above."</p>
        }
        .into_any(),
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <Navbar />
            <div class="max-w-4xl mx-auto p-4 space-y-4">
                <AlertHost notice=notice set_notice=set_notice />
                <h2 class="text-2xl font-bold">"Administration"</h2>

                <div class="tabs tabs-boxed">
                    {TABS
                        .iter()
                        .map(|(label, tab)| {
                            let tab = *tab;
                            let active = action == Some(tab);
                            let class = if active { "tab tab-active" } else { "tab" };
                            view! {
                                <a
                                    class=class
                                    on:click=move |_| {
                                        router.navigate_route(AppRoute::SuperAdminAction(tab));
                                    }
                                >
                                    {*label}
                                </a>
                            }
                        })
                        .collect_view()}
                </div>

                {panel}
            </div>
        </div>
    }
}
