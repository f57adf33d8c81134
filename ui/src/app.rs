use leptos::*;
use leptos::prelude::ElementChild;
use leptos::prelude::ClassAttribute;
use crate::routes::RoutesMenu;
use leptos_router::components::Router;

use leptos_meta::{Title, provide_meta_context};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
      <Title text="Birthday Cake"/>
      <Router>
        <main class="min-h-screen bg-surface">
          <RoutesMenu/>
        </main>
      </Router>
    }
}
