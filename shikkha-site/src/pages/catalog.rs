use std::rc::Rc;

use shikkha_api::CourseSummary;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::Route;
use crate::components::modal::ErrorModal;
use crate::context::{ClientContext, SiteClient};

fn price_label(course: &CourseSummary) -> String {
    if course.is_free || course.price == 0.0 {
        "ফ্রি".to_string()
    } else {
        format!("৳{:.0}", course.price)
    }
}

#[derive(yew::Properties, PartialEq)]
pub struct CourseCardProps {
    pub course: CourseSummary,
    pub on_enroll: Callback<CourseSummary>,
}

#[function_component(CourseCard)]
pub fn course_card(CourseCardProps { course, on_enroll }: &CourseCardProps) -> Html {
    let onclick = {
        let course = course.clone();
        on_enroll.reform(move |_: MouseEvent| course.clone())
    };

    html! {
        <div class="card course">
            if let Some(thumbnail) = &course.thumbnail {
                <img class="thumbnail" src={thumbnail.clone()} alt={course.title.clone()} />
            }
            <div class="details">
                <h3>{ &course.title }</h3>
                <p>{ &course.description }</p>
                <span class="meta">{ format!("{} · {} · {}", course.category, course.language, course.duration) }</span>
            </div>
            <div class="actions">
                <span class="price">{ price_label(course) }</span>
                <button class="btn-primary" {onclick}>{ "কোর্সে ভর্তি হন" }</button>
            </div>
        </div>
    }
}

async fn enroll(client: Rc<SiteClient>, course: CourseSummary) -> Result<Route, String> {
    match client.enroll(&course.id).await {
        Ok(enrollment) => {
            log::info!("Enrolled in course {}", enrollment.course.id);
            Ok(Route::Learn { slug: course.slug })
        }
        Err(e) => {
            log::error!("Failed to enroll in course {}: {e}", course.id);
            Err(e.user_message())
        }
    }
}

/// Public list of courses
#[function_component(Catalog)]
pub fn catalog() -> Html {
    let context = use_context::<ClientContext>().expect("ClientContext not found");
    let navigator = use_navigator();
    let courses: UseStateHandle<Option<Vec<CourseSummary>>> = use_state(|| None);
    let error: UseStateHandle<Option<String>> = use_state(|| None);

    {
        let context = context.clone();
        let courses = courses.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match context.client().list_courses().await {
                    Ok(list) => courses.set(Some(list)),
                    Err(e) => {
                        log::error!("Failed to fetch courses: {e}");
                        courses.set(Some(vec![]));
                        error.set(Some(e.user_message()));
                    }
                }
            });
            || ()
        });
    }

    let on_enroll = {
        let error = error.clone();
        Callback::from(move |course: CourseSummary| {
            let Some(navigator) = navigator.clone() else {
                return;
            };
            let client = match context.authorized_client() {
                Ok(client) => client,
                Err(_) => {
                    navigator.push(&context.login_route());
                    return;
                }
            };
            let error = error.clone();
            spawn_local(async move {
                match enroll(client, course).await {
                    Ok(route) => navigator.push(&route),
                    Err(message) => error.set(Some(message)),
                }
            });
        })
    };

    let on_close = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let body = match &*courses {
        None => html! { <p>{ "লোড হচ্ছে..." }</p> },
        Some(list) if list.is_empty() => html! { <p>{ "এখনো কোনো কোর্স নেই।" }</p> },
        Some(list) => html! {
            <div class="course-list list">
            {
                list.iter().map(|course| html! {
                    <CourseCard key={course.id.to_string()} course={course.clone()} on_enroll={on_enroll.clone()} />
                }).collect::<Html>()
            }
            </div>
        },
    };

    html! {
        <div class="page catalog">
            <header class="header">
                <h1>{ "সকল কোর্স" }</h1>
                <nav>
                    <Link<Route> to={Route::Dashboard}>{ "আমার কোর্স" }</Link<Route>>
                    { " · " }
                    <Link<Route> to={Route::Teach}>{ "শিক্ষক হতে আবেদন" }</Link<Route>>
                </nav>
            </header>
            { body }
            if let Some(message) = (*error).clone() {
                <ErrorModal message={message} {on_close} />
            }
        </div>
    }
}
