//! Role Assignment Screen
//!
//! Access administration with three tabs:
//! - Users, each with a dialog editing the user's roles
//! - Roles, each with a dialog editing the role's permissions
//! - Create Role
//!
//! All data lives in this component and is lost on reload.

mod create_role;
mod dialog;

use leptos::*;
use tracing::{debug, warn};

use gatehouse_shared::{
    add_association, remove_association_at, Directory, EntityId, Role, Tag, User,
};

use crate::components::common::{KeyIcon, ShieldIcon, UsersIcon};

use create_role::CreateRolePanel;
use dialog::AssociationDialog;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AccessTab {
    Users,
    Roles,
    CreateRole,
}

impl AccessTab {
    const ALL: [AccessTab; 3] = [AccessTab::Users, AccessTab::Roles, AccessTab::CreateRole];

    fn label(self) -> &'static str {
        match self {
            AccessTab::Users => "Users",
            AccessTab::Roles => "Roles",
            AccessTab::CreateRole => "Create Role",
        }
    }
}

// ============================================================================
// Main Component
// ============================================================================

/// Role and permission assignment screen
#[component]
pub fn RoleAssignment() -> impl IntoView {
    let directory = create_rw_signal(Directory::seeded());
    let (active_tab, set_active_tab) = create_signal(AccessTab::Users);

    // Dialog state. The selected owner survives closing the dialog.
    let (selected_user, set_selected_user) = create_signal(Option::<User>::None);
    let (selected_role, set_selected_role) = create_signal(Option::<Role>::None);
    let (user_dialog_open, set_user_dialog_open) = create_signal(false);
    let (role_dialog_open, set_role_dialog_open) = create_signal(false);

    let open_user = move |user: User| {
        debug!(user = user.id, "editing user roles");
        set_selected_user.set(Some(user));
        set_user_dialog_open.set(true);
    };

    let open_role = move |role: Role| {
        debug!(role = role.id, "editing role permissions");
        set_selected_role.set(Some(role));
        set_role_dialog_open.set(true);
    };

    let close_user = move |_: ()| {
        set_user_dialog_open.set(false);
        if let Some(user) = selected_user.get_untracked() {
            directory.update(|d| {
                if let Err(e) = d.commit_user(user) {
                    warn!(error = %e, "could not save user roles");
                }
            });
        }
    };

    let close_role = move |_: ()| {
        set_role_dialog_open.set(false);
        if let Some(role) = selected_role.get_untracked() {
            directory.update(|d| {
                if let Err(e) = d.commit_role(role) {
                    warn!(error = %e, "could not save role permissions");
                }
            });
        }
    };

    let add_role_to_user = move |id: EntityId| {
        set_selected_user.update(|u| {
            if let Some(user) = u {
                *user = add_association(user, id);
            }
        });
    };

    let remove_role_from_user = move |index: usize| {
        set_selected_user.update(|u| {
            if let Some(user) = u {
                *user = remove_association_at(user, index);
            }
        });
    };

    let add_permission_to_role = move |id: EntityId| {
        set_selected_role.update(|r| {
            if let Some(role) = r {
                *role = add_association(role, id);
            }
        });
    };

    let remove_permission_from_role = move |index: usize| {
        set_selected_role.update(|r| {
            if let Some(role) = r {
                *role = remove_association_at(role, index);
            }
        });
    };

    let user_tags = Signal::derive(move || {
        selected_user.with(|u| {
            u.as_ref()
                .map(|user| directory.with(|d| d.role_tags(user)))
                .unwrap_or_default()
        })
    });
    let role_tags = Signal::derive(move || {
        selected_role.with(|r| {
            r.as_ref()
                .map(|role| directory.with(|d| d.permission_tags(role)))
                .unwrap_or_default()
        })
    });
    let role_options = Signal::derive(move || directory.with(|d| Tag::options(&d.roles)));
    let permission_options = Signal::derive(move || directory.with(|d| Tag::options(&d.permissions)));

    view! {
        <div class="flex-1 overflow-auto p-6 bg-slate-900">
            <div class="max-w-5xl mx-auto">
                // Header
                <div class="mb-6">
                    <h1 class="text-2xl font-bold text-white">"Access Management"</h1>
                    <p class="text-slate-400 mt-1">"Assign roles to users and permissions to roles"</p>
                </div>

                // Tabs
                <div class="flex gap-1 border-b border-slate-700 mb-6">
                    {AccessTab::ALL.into_iter().map(|tab| {
                        view! {
                            <button
                                class=move || {
                                    if active_tab.get() == tab {
                                        "px-4 py-2 text-sm font-medium text-white border-b-2 border-blue-500"
                                    } else {
                                        "px-4 py-2 text-sm font-medium text-slate-400 hover:text-white border-b-2 border-transparent"
                                    }
                                }
                                on:click=move |_| set_active_tab.set(tab)
                            >
                                {tab.label()}
                            </button>
                        }
                    }).collect_view()}
                </div>

                {move || match active_tab.get() {
                    AccessTab::Users => view! {
                        <UserList directory=directory on_edit=open_user />
                    }.into_view(),
                    AccessTab::Roles => view! {
                        <RoleList directory=directory on_edit=open_role />
                    }.into_view(),
                    AccessTab::CreateRole => view! {
                        <CreateRolePanel directory=directory />
                    }.into_view(),
                }}

                <Show when=move || user_dialog_open.get()>
                    <AssociationDialog
                        title=Signal::derive(move || {
                            selected_user.with(|u| {
                                u.as_ref().map(|u| format!("Roles for {}", u.name)).unwrap_or_default()
                            })
                        })
                        tags=user_tags
                        options=role_options
                        picker_placeholder="Add role..."
                        on_add=add_role_to_user
                        on_remove=remove_role_from_user
                        on_close=close_user
                    />
                </Show>

                <Show when=move || role_dialog_open.get()>
                    <AssociationDialog
                        title=Signal::derive(move || {
                            selected_role.with(|r| {
                                r.as_ref().map(|r| format!("Permissions for {}", r.name)).unwrap_or_default()
                            })
                        })
                        tags=role_tags
                        options=permission_options
                        picker_placeholder="Add permission..."
                        on_add=add_permission_to_role
                        on_remove=remove_permission_from_role
                        on_close=close_role
                    />
                </Show>
            </div>
        </div>
    }
}

// ============================================================================
// Lists
// ============================================================================

#[component]
fn UserList(
    directory: RwSignal<Directory>,
    #[prop(into)] on_edit: Callback<User>,
) -> impl IntoView {
    view! {
        <div class="space-y-2">
            {move || directory.with(|d| {
                d.users.iter().map(|user| {
                    let tags = d.role_tags(user);
                    let user = user.clone();
                    view! {
                        <OwnerRow
                            name=user.name.clone()
                            tags=tags
                            empty_label="No roles"
                            on_edit=move |_: ()| on_edit.call(user.clone())
                        >
                            <UsersIcon class="w-5 h-5 text-slate-400" />
                        </OwnerRow>
                    }
                }).collect_view()
            })}
        </div>
    }
}

#[component]
fn RoleList(
    directory: RwSignal<Directory>,
    #[prop(into)] on_edit: Callback<Role>,
) -> impl IntoView {
    view! {
        <div class="space-y-2">
            {move || directory.with(|d| {
                d.roles.iter().map(|role| {
                    let tags = d.permission_tags(role);
                    let role = role.clone();
                    view! {
                        <OwnerRow
                            name=role.name.clone()
                            tags=tags
                            empty_label="No permissions"
                            on_edit=move |_: ()| on_edit.call(role.clone())
                        >
                            <ShieldIcon class="w-5 h-5 text-violet-400" />
                        </OwnerRow>
                    }
                }).collect_view()
            })}
        </div>
    }
}

/// One user or role with its current associations
#[component]
fn OwnerRow(
    name: String,
    tags: Vec<Tag>,
    empty_label: &'static str,
    #[prop(into)] on_edit: Callback<()>,
    children: Children,
) -> impl IntoView {
    let summary = if tags.is_empty() {
        view! { <span class="text-xs text-slate-500">{empty_label}</span> }.into_view()
    } else {
        tags.into_iter()
            .map(|tag| {
                view! {
                    <span class="inline-flex items-center gap-1 px-2 py-0.5 rounded-full bg-slate-700 text-slate-300 text-xs">
                        <KeyIcon class="w-3 h-3" />
                        {tag.label}
                    </span>
                }
            })
            .collect_view()
    };

    view! {
        <div class="flex items-center justify-between p-4 bg-slate-800 rounded-lg border border-slate-700">
            <div class="flex items-center gap-3 min-w-0">
                {children()}
                <div class="min-w-0">
                    <p class="text-sm font-medium text-white">{name}</p>
                    <div class="flex flex-wrap gap-1 mt-1">{summary}</div>
                </div>
            </div>
            <button
                class="px-3 py-1.5 text-sm text-slate-300 hover:text-white bg-slate-700 hover:bg-slate-600 \
                       rounded-lg transition-colors"
                on:click=move |_| on_edit.call(())
            >
                "Edit"
            </button>
        </div>
    }
}
