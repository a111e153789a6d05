use shikkha_api::api::teachers::apply::post::Request;
use shikkha_api::{ApplicationStatus, TeacherApplication};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::modal::ErrorModal;
use crate::context::use_authorized_client;

fn status_label(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => "অপেক্ষমাণ",
        ApplicationStatus::Approved => "অনুমোদিত",
        ApplicationStatus::Rejected => "প্রত্যাখ্যাত",
    }
}

/// Application of the logged in user to become a teacher
#[function_component(TeachApplication)]
pub fn teach_application() -> Html {
    let client = use_authorized_client();
    let expertise = use_state(String::new);
    let bio = use_state(String::new);
    let submitted: UseStateHandle<Option<TeacherApplication>> = use_state(|| None);
    let error: UseStateHandle<Option<String>> = use_state(|| None);

    let on_expertise = {
        let expertise = expertise.clone();
        Callback::from(move |e: InputEvent| {
            expertise.set(e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };

    let on_bio = {
        let bio = bio.clone();
        Callback::from(move |e: InputEvent| {
            bio.set(e.target_unchecked_into::<HtmlTextAreaElement>().value())
        })
    };

    let onsubmit = {
        let expertise = expertise.clone();
        let bio = bio.clone();
        let submitted = submitted.clone();
        let error = error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(client) = client.clone() else {
                return;
            };
            let request = Request {
                expertise: expertise.trim().to_string(),
                bio: bio.trim().to_string(),
            };
            let submitted = submitted.clone();
            let error = error.clone();
            spawn_local(async move {
                match client.apply_teacher(&request).await {
                    Ok(application) => submitted.set(Some(application)),
                    Err(e) => {
                        log::error!("Failed to submit teacher application: {e}");
                        error.set(Some(e.user_message()));
                    }
                }
            });
        })
    };

    let on_close = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    html! {
        <div class="page teach">
            <header class="header">
                <h1>{ "শিক্ষক হতে আবেদন" }</h1>
            </header>
            if let Some(application) = &*submitted {
                <div class="card">
                    <p>{ "আপনার আবেদন জমা হয়েছে।" }</p>
                    <p>{ format!("অবস্থা: {}", status_label(application.status)) }</p>
                </div>
            } else {
                <form class="card" {onsubmit}>
                    <div class="form-row">
                        <label for="expertise">{ "দক্ষতার বিষয়" }</label>
                        <input id="expertise" type="text" value={(*expertise).clone()} oninput={on_expertise} />
                    </div>
                    <div class="form-row">
                        <label for="bio">{ "নিজের সম্পর্কে" }</label>
                        <textarea id="bio" value={(*bio).clone()} oninput={on_bio} />
                    </div>
                    <button type="submit" class="btn-primary">{ "আবেদন জমা দিন" }</button>
                </form>
            }
            if let Some(message) = (*error).clone() {
                <ErrorModal message={message} {on_close} />
            }
        </div>
    }
}
