use std::rc::Rc;

use shikkha_client::session::{self, CredentialStore};
use shikkha_client::{ApiClient, ClientConfig, Result};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::Route;
use crate::platform::fetch::GlooTransport;
use crate::platform::storage::LocalStorage;

pub type SiteClient = ApiClient<GlooTransport>;

/// Configuration and credential storage shared by every page
#[derive(Clone, Debug, PartialEq)]
pub struct ClientContext {
    pub config: Rc<ClientConfig>,
    pub store: Rc<LocalStorage>,
}

impl ClientContext {
    fn load() -> Self {
        let config = crate::platform::load_config();
        log::info!("Using API at {}", config.api_base);
        let store = LocalStorage::new(config.token_key.clone());
        Self {
            config: Rc::new(config),
            store: Rc::new(store),
        }
    }

    /// Client without credentials, used by the login page.
    pub fn anonymous_client(&self) -> Rc<SiteClient> {
        Rc::new(ApiClient::new(Rc::clone(&self.config), GlooTransport))
    }

    /// Client carrying the stored credential. Fails when nobody is logged in.
    pub fn authorized_client(&self) -> Result<Rc<SiteClient>> {
        let session = session::bootstrap(self.credentials())?;
        Ok(Rc::new(
            ApiClient::new(Rc::clone(&self.config), GlooTransport).with_session(session),
        ))
    }

    /// Client carrying the stored credential if there is one.
    pub fn client(&self) -> Rc<SiteClient> {
        self.authorized_client()
            .unwrap_or_else(|_| self.anonymous_client())
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    pub fn login_route(&self) -> Route {
        Route::recognize(&self.config.login_route).unwrap_or(Route::Login)
    }
}

/// Returns an authorized client, or sends the user to the login route.
#[hook]
pub fn use_authorized_client() -> Option<Rc<SiteClient>> {
    let context = use_context::<ClientContext>().expect("ClientContext not found");
    let navigator = use_navigator();
    let client = use_memo((), |_| context.authorized_client().ok());

    {
        let missing = client.is_none();
        let login = context.login_route();
        use_effect_with(missing, move |missing| {
            if *missing && let Some(navigator) = navigator {
                navigator.push(&login);
            }
            || ()
        });
    }

    (*client).clone()
}

#[derive(Properties, PartialEq)]
pub struct ClientProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(ClientProvider)]
pub fn client_provider(props: &ClientProviderProps) -> Html {
    let context = use_memo((), |_| ClientContext::load());

    html! {
        <ContextProvider<ClientContext> context={(*context).clone()}>
            { props.children.clone() }
        </ContextProvider<ClientContext>>
    }
}
