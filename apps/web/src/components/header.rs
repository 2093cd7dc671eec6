//! Page header

use leptos::*;
use leptos_router::A;

use crate::app::use_config;

/// Product banner shared by every page; `children` go on the right
#[component]
pub fn AppHeader(#[prop(optional)] children: Option<Children>) -> impl IntoView {
    let listing = use_config().routes.listing;

    view! {
        <header class="app-header">
            <A href=listing class="header-title">
                "SELENOSIS-UI"
            </A>
            {children.map(|children| view! { <div class="header-stats">{children()}</div> })}
        </header>
    }
}
