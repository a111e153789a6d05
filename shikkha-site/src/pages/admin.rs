use std::rc::Rc;

use shikkha_api::api::admin::teachers::review::put::Decision;
use shikkha_api::{ApplicationId, ApplicationStatus, CourseId, CourseSummary, Role, TeacherApplication, User, UserId};
use shikkha_client::Result;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::modal::ErrorModal;
use crate::context::{SiteClient, use_authorized_client};
use crate::platform;

#[derive(Clone, Debug, Default, PartialEq)]
struct AdminData {
    applications: Vec<TeacherApplication>,
    users: Vec<User>,
    courses: Vec<CourseSummary>,
}

async fn fetch_admin_data(client: &SiteClient) -> Result<AdminData> {
    Ok(AdminData {
        applications: client.teacher_applications().await?,
        users: client.list_users().await?,
        courses: client.list_courses().await?,
    })
}

/// Bumped after every successful mutation, which reloads the lists. Each dispatch increments the
/// current value, so mutations finishing before the next render are all counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Revision(u32);

impl Reducible for Revision {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Self(self.0.wrapping_add(1)))
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Student => "শিক্ষার্থী",
        Role::Teacher => "শিক্ষক",
        Role::Admin => "অ্যাডমিন",
    }
}

/// Runs an admin mutation, then reloads every list on success.
fn mutate<F, Fut>(
    client: &Option<Rc<SiteClient>>,
    refresh: &UseReducerHandle<Revision>,
    error: &UseStateHandle<Option<String>>,
    what: &'static str,
    mutation: F,
) where
    F: FnOnce(Rc<SiteClient>) -> Fut + 'static,
    Fut: Future<Output = Result<()>> + 'static,
{
    let Some(client) = client.clone() else {
        return;
    };
    let refresh = refresh.clone();
    let error = error.clone();
    spawn_local(async move {
        match mutation(client).await {
            Ok(()) => refresh.dispatch(()),
            Err(e) => {
                log::error!("Failed to {what}: {e}");
                error.set(Some(e.user_message()));
            }
        }
    });
}

/// Review of teacher applications and management of users and courses
#[function_component(AdminDashboard)]
pub fn admin_dashboard() -> Html {
    let client = use_authorized_client();
    let data: UseStateHandle<Option<AdminData>> = use_state(|| None);
    let error: UseStateHandle<Option<String>> = use_state(|| None);
    let refresh = use_reducer(Revision::default);

    {
        let client = client.clone();
        let data = data.clone();
        let error = error.clone();
        use_effect_with(refresh.0, move |_| {
            if let Some(client) = client {
                spawn_local(async move {
                    match fetch_admin_data(&client).await {
                        Ok(loaded) => data.set(Some(loaded)),
                        Err(e) => {
                            log::error!("Failed to fetch admin data: {e}");
                            error.set(Some(e.user_message()));
                        }
                    }
                });
            }
            || ()
        });
    }

    let on_review = {
        let client = client.clone();
        let refresh = refresh.clone();
        let error = error.clone();
        Callback::from(move |(id, decision): (ApplicationId, Decision)| {
            mutate(&client, &refresh, &error, "review application", move |client| async move {
                client.review_application(&id, decision).await.map(|_| ())
            });
        })
    };

    let on_delete_user = {
        let client = client.clone();
        let refresh = refresh.clone();
        let error = error.clone();
        Callback::from(move |id: UserId| {
            if !platform::confirm("আপনি কি ব্যবহারকারীকে মুছে ফেলতে চান?") {
                return;
            }
            mutate(&client, &refresh, &error, "delete user", move |client| async move {
                client.delete_user(&id).await
            });
        })
    };

    let on_delete_course = {
        let client = client.clone();
        let refresh = refresh.clone();
        let error = error.clone();
        Callback::from(move |id: CourseId| {
            if !platform::confirm("আপনি কি কোর্সটি মুছে ফেলতে চান?") {
                return;
            }
            mutate(&client, &refresh, &error, "delete course", move |client| async move {
                client.delete_course(&id).await
            });
        })
    };

    let on_close = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let Some(data) = &*data else {
        return html! {
            <div class="page admin">
                <p>{ "লোড হচ্ছে..." }</p>
                if let Some(message) = (*error).clone() {
                    <ErrorModal message={message} {on_close} />
                }
            </div>
        };
    };

    let applications = data
        .applications
        .iter()
        .map(|application| {
            let pending = application.status == ApplicationStatus::Pending;
            let approve = {
                let id = application.id.clone();
                on_review.reform(move |_: MouseEvent| (id.clone(), Decision::Approve))
            };
            let reject = {
                let id = application.id.clone();
                on_review.reform(move |_: MouseEvent| (id.clone(), Decision::Reject))
            };
            html! {
                <tr key={application.id.to_string()}>
                    <td>{ &application.name }</td>
                    <td>{ &application.email }</td>
                    <td>{ &application.expertise }</td>
                    <td>
                        <button class="btn-primary" disabled={!pending} onclick={approve}>{ "অনুমোদন" }</button>
                        <button class="btn-danger" disabled={!pending} onclick={reject}>{ "প্রত্যাখ্যান" }</button>
                    </td>
                </tr>
            }
        })
        .collect::<Html>();

    let users = data
        .users
        .iter()
        .map(|user| {
            let onclick = {
                let id = user.id.clone();
                on_delete_user.reform(move |_: MouseEvent| id.clone())
            };
            html! {
                <tr key={user.id.to_string()}>
                    <td>{ &user.name }</td>
                    <td>{ &user.email }</td>
                    <td>{ role_label(user.role) }</td>
                    <td><button class="btn-danger" disabled={user.role == Role::Admin} {onclick}>{ "মুছুন" }</button></td>
                </tr>
            }
        })
        .collect::<Html>();

    let courses = data
        .courses
        .iter()
        .map(|course| {
            let onclick = {
                let id = course.id.clone();
                on_delete_course.reform(move |_: MouseEvent| id.clone())
            };
            html! {
                <tr key={course.id.to_string()}>
                    <td>{ &course.title }</td>
                    <td>{ &course.category }</td>
                    <td><button class="btn-danger" {onclick}>{ "মুছুন" }</button></td>
                </tr>
            }
        })
        .collect::<Html>();

    html! {
        <div class="page admin">
            <header class="header">
                <h1>{ "অ্যাডমিন প্যানেল" }</h1>
            </header>

            <section class="card">
                <h2>{ "শিক্ষক আবেদন" }</h2>
                <table>{ applications }</table>
            </section>

            <section class="card">
                <h2>{ "ব্যবহারকারী" }</h2>
                <table>{ users }</table>
            </section>

            <section class="card">
                <h2>{ "কোর্স" }</h2>
                <table>{ courses }</table>
            </section>

            if let Some(message) = (*error).clone() {
                <ErrorModal message={message} {on_close} />
            }
        </div>
    }
}
