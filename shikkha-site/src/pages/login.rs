use shikkha_client::session;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::Route;
use crate::components::modal::ErrorModal;
use crate::context::ClientContext;

#[function_component(Login)]
pub fn login() -> Html {
    let context = use_context::<ClientContext>().expect("ClientContext not found");
    let navigator = use_navigator();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error: UseStateHandle<Option<String>> = use_state(|| None);
    let busy = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            email.set(e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            password.set(e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };

    let onsubmit = {
        let context = context.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }
            busy.set(true);

            let context = context.clone();
            let navigator = navigator.clone();
            let email = (*email).clone();
            let password = (*password).clone();
            let error = error.clone();
            let busy = busy.clone();
            spawn_local(async move {
                let client = context.anonymous_client();
                match session::login(&client, context.credentials(), &email, &password).await {
                    Ok(_) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Dashboard);
                        }
                    }
                    Err(e) => {
                        log::error!("Login failed: {e}");
                        error.set(Some(e.user_message()));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_close = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    html! {
        <div class="page login">
            <header class="header">
                <h1>{ "লগইন" }</h1>
            </header>
            <form class="card" {onsubmit}>
                <div class="form-row">
                    <label for="email">{ "ইমেইল" }</label>
                    <input id="email" type="email" value={(*email).clone()} oninput={on_email} />
                </div>
                <div class="form-row">
                    <label for="password">{ "পাসওয়ার্ড" }</label>
                    <input id="password" type="password" value={(*password).clone()} oninput={on_password} />
                </div>
                <button type="submit" class="btn-primary" disabled={*busy}>{ "লগইন করুন" }</button>
            </form>
            if let Some(message) = (*error).clone() {
                <ErrorModal message={message} {on_close} />
            }
        </div>
    }
}
