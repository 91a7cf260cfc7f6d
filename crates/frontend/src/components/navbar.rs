use dioxus::prelude::*;

#[component]
pub fn Navbar(menu_open: Signal<bool>) -> Element {
    rsx! {
        nav { class: "navbar",
            div { class: "navbar-title", "Transit Explorer" }
            button {
                class: "menu-toggle",
                "aria-label": "Toggle menu",
                "aria-expanded": "{menu_open}",
                onclick: move |_| {
                    let open = !*menu_open.read();
                    menu_open.set(open);
                },
                span { class: "menu-bar" }
                span { class: "menu-bar" }
                span { class: "menu-bar" }
            }
        }
    }
}
