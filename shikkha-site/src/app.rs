use yew::prelude::*;
use yew_router::prelude::*;

use crate::context::ClientProvider;
use crate::pages::admin::AdminDashboard;
use crate::pages::catalog::Catalog;
use crate::pages::dashboard::Dashboard;
use crate::pages::login::Login;
use crate::pages::player::CoursePlayerPage;
use crate::pages::teach::TeachApplication;

#[derive(Debug, Clone, PartialEq, Routable)]
pub enum Route {
    #[at("/")]
    Home,

    #[at("/login")]
    Login,

    #[at("/dashboard")]
    Dashboard,

    #[at("/courses/:slug/learn")]
    Learn { slug: String },

    #[at("/teach")]
    Teach,

    #[at("/admin")]
    Admin,

    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <Catalog /> },
        Route::Login => html! { <Login /> },
        Route::Dashboard => html! { <Dashboard /> },
        Route::Learn { slug } => {
            html! {
                <CoursePlayerPage slug={slug} />
            }
        }
        Route::Teach => html! { <TeachApplication /> },
        Route::Admin => html! { <AdminDashboard /> },
        Route::NotFound => {
            html! {
                <div class="page">
                    <h1>{ "পাতাটি পাওয়া যায়নি" }</h1>
                    <Link<Route> to={Route::Home}>{ "কোর্সের তালিকায় ফিরে যান" }</Link<Route>>
                </div>
            }
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <ClientProvider>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ClientProvider>
    }
}
