use shikkha_api::Enrollment;
use shikkha_client::session;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::Route;
use crate::components::modal::ErrorModal;
use crate::components::progress::ProgressBar;
use crate::context::{ClientContext, use_authorized_client};

#[derive(yew::Properties, PartialEq)]
pub struct EnrollmentCardProps {
    pub enrollment: Enrollment,
}

#[function_component(EnrollmentCard)]
pub fn enrollment_card(EnrollmentCardProps { enrollment }: &EnrollmentCardProps) -> Html {
    let course = &enrollment.course;

    html! {
        <div class="card enrollment">
            <div class="details">
                <h3>{ &course.title }</h3>
                <span class="meta">{ format!("ভর্তি: {}", enrollment.enrolled_at.format("%d/%m/%Y")) }</span>
            </div>
            <ProgressBar value={enrollment.progress} />
            <Link<Route> classes="btn-primary" to={Route::Learn { slug: course.slug.clone() }}>
                { "শেখা চালিয়ে যান" }
            </Link<Route>>
        </div>
    }
}

/// Courses the logged in user is enrolled in
#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let context = use_context::<ClientContext>().expect("ClientContext not found");
    let navigator = use_navigator();
    let client = use_authorized_client();
    let enrollments: UseStateHandle<Option<Vec<Enrollment>>> = use_state(|| None);
    let error: UseStateHandle<Option<String>> = use_state(|| None);

    {
        let enrollments = enrollments.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            if let Some(client) = client {
                spawn_local(async move {
                    match client.my_enrollments().await {
                        Ok(list) => enrollments.set(Some(list)),
                        Err(e) => {
                            log::error!("Failed to fetch enrollments: {e}");
                            enrollments.set(Some(vec![]));
                            error.set(Some(e.user_message()));
                        }
                    }
                });
            }
            || ()
        });
    }

    let on_logout = {
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(e) = session::logout(context.credentials()) {
                log::error!("Failed to clear the stored credential: {e}");
                error.set(Some(e.user_message()));
                return;
            }
            if let Some(navigator) = &navigator {
                navigator.push(&context.login_route());
            }
        })
    };

    let on_close = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let body = match &*enrollments {
        None => html! { <p>{ "লোড হচ্ছে..." }</p> },
        Some(list) if list.is_empty() => html! {
            <p>
                { "আপনি এখনো কোনো কোর্সে ভর্তি হননি। " }
                <Link<Route> to={Route::Home}>{ "কোর্স খুঁজুন" }</Link<Route>>
            </p>
        },
        Some(list) => html! {
            <div class="enrollment-list list">
            {
                list.iter().map(|enrollment| html! {
                    <EnrollmentCard key={enrollment.id.clone()} enrollment={enrollment.clone()} />
                }).collect::<Html>()
            }
            </div>
        },
    };

    html! {
        <div class="page dashboard">
            <header class="header">
                <h1>{ "আমার কোর্স" }</h1>
                <button class="btn-danger" onclick={on_logout}>{ "লগআউট" }</button>
            </header>
            { body }
            if let Some(message) = (*error).clone() {
                <ErrorModal message={message} {on_close} />
            }
        </div>
    }
}
