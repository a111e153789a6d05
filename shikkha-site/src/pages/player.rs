use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use shikkha_api::{LessonId, NoteId};
use shikkha_client::notes::{self, NoteDraft};
use shikkha_client::playback::{QualitySelection, SessionSlot};
use shikkha_client::player::{self, CoursePlayer, PlaybackState, PlayerAction};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlSelectElement, HtmlVideoElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::Route;
use crate::components::modal::ErrorModal;
use crate::components::notes::NotesPanel;
use crate::components::progress::ProgressBar;
use crate::components::syllabus::syllabus;
use crate::context::use_authorized_client;
use crate::platform;
use crate::platform::hls::HlsBackend;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerModel(CoursePlayer);

impl Deref for PlayerModel {
    type Target = CoursePlayer;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Reducible for PlayerModel {
    type Action = PlayerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.0.apply(action);
        Rc::new(next)
    }
}

type Slot = Rc<RefCell<Option<SessionSlot<HlsBackend>>>>;

fn current_position(video: &NodeRef) -> f64 {
    video
        .cast::<HtmlVideoElement>()
        .map(|v| v.current_time())
        .unwrap_or_default()
}

fn quality_selector(player: &CoursePlayer, onchange: Callback<Event>) -> Html {
    let PlaybackState::Playing { levels, quality, .. } = player.playback() else {
        return html! {};
    };
    if levels.is_empty() {
        return html! {};
    }

    let selected = match quality {
        QualitySelection::Auto => "auto".to_string(),
        QualitySelection::Level(index) => index.to_string(),
    };

    html! {
        <select class="quality" {onchange}>
            <option value="auto" selected={selected == "auto"}>{ "অটো" }</option>
            {
                levels.iter().map(|level| {
                    let value = level.index.to_string();
                    html! {
                        <option selected={selected == value} value={value.clone()}>{ level.label() }</option>
                    }
                }).collect::<Html>()
            }
        </select>
    }
}

#[derive(yew::Properties, PartialEq, Eq)]
pub struct CoursePlayerPageProps {
    pub slug: String,
}

/// Video player of an enrolled course, with its syllabus, progress and notes
#[function_component(CoursePlayerPage)]
pub fn course_player_page(CoursePlayerPageProps { slug }: &CoursePlayerPageProps) -> Html {
    let client = use_authorized_client();
    let player = use_reducer(PlayerModel::default);
    let video_ref = use_node_ref();
    let slot: Slot = use_mut_ref(|| None);

    {
        let client = client.clone();
        let player = player.clone();
        use_effect_with(slug.clone(), move |slug| {
            if let Some(client) = client {
                let slug = slug.clone();
                spawn_local(async move {
                    player.dispatch(player::load_course(&client, &slug).await);
                });
            }
            || ()
        });
    }

    // The streaming session never outlives the page
    {
        let slot = slot.clone();
        use_effect_with((), move |_| {
            move || {
                slot.borrow_mut().take();
            }
        });
    }

    // A new lesson: drop the previous session, then fetch the URL and the side channel
    {
        let client = client.clone();
        let player = player.clone();
        let slot = slot.clone();
        use_effect_with(player.ticket().cloned(), move |ticket| {
            if let Some(slot) = slot.borrow_mut().as_mut() {
                slot.release();
            }
            if let (Some(client), Some(ticket)) = (client, ticket.clone()) {
                if player.pending_url() == Some(&ticket) {
                    let client = client.clone();
                    let player = player.clone();
                    let ticket = ticket.clone();
                    spawn_local(async move {
                        player.dispatch(player::resolve_playback_url(&client, ticket).await);
                    });
                }
                spawn_local(async move {
                    for action in player::load_lesson_state(&client, ticket).await {
                        player.dispatch(action);
                    }
                });
            }
            || ()
        });
    }

    {
        let player = player.clone();
        let slot = slot.clone();
        let video_ref = video_ref.clone();
        let pending = player
            .pending_attach()
            .map(|(ticket, url)| (ticket.clone(), url.to_string()));
        use_effect_with(pending, move |pending| {
            if let Some((ticket, url)) = pending.clone() {
                match video_ref.cast::<HtmlVideoElement>() {
                    Some(video) => {
                        let dispatch: Rc<dyn Fn(PlayerAction)> = {
                            let player = player.clone();
                            Rc::new(move |action| player.dispatch(action))
                        };
                        let mut guard = slot.borrow_mut();
                        let slot = guard.get_or_insert_with(|| SessionSlot::new(HlsBackend::new(video)));
                        let action = player::attach_stream(slot, ticket, &url, dispatch);
                        drop(guard);
                        player.dispatch(action);
                    }
                    None => log::error!("Video element is not mounted"),
                }
            }
            || ()
        });
    }

    {
        let slot = slot.clone();
        use_effect_with(player.quality(), move |quality| {
            if let (Some(quality), Some(slot)) = (*quality, slot.borrow().as_ref()) {
                slot.set_quality(quality);
            }
            || ()
        });
    }

    let on_select = {
        let player = player.clone();
        Callback::from(move |lesson: LessonId| player.dispatch(PlayerAction::Select(lesson)))
    };

    let on_previous = {
        let player = player.clone();
        Callback::from(move |_: MouseEvent| player.dispatch(PlayerAction::Previous))
    };

    let on_next = {
        let player = player.clone();
        Callback::from(move |_: MouseEvent| player.dispatch(PlayerAction::Next))
    };

    let on_quality = {
        let player = player.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            let selection = value
                .parse()
                .map(QualitySelection::Level)
                .unwrap_or(QualitySelection::Auto);
            player.dispatch(PlayerAction::QualityChosen(selection));
        })
    };

    let on_complete = {
        let client = client.clone();
        let player = player.clone();
        let video_ref = video_ref.clone();
        Callback::from(move |_: MouseEvent| {
            let (Some(client), Some(course), Some(ticket)) =
                (client.clone(), player.course(), player.ticket())
            else {
                return;
            };
            let course = course.id.clone();
            let lesson = ticket.lesson.clone();
            let position = current_position(&video_ref);
            let player = player.clone();
            spawn_local(async move {
                player.dispatch(player::mark_complete(&client, &course, lesson, position).await);
            });
        })
    };

    let on_create_note = {
        let client = client.clone();
        let player = player.clone();
        let video_ref = video_ref.clone();
        Callback::from(move |draft: NoteDraft| {
            let (Some(client), Some(course), Some(ticket)) =
                (client.clone(), player.course(), player.ticket())
            else {
                return;
            };
            let course = course.id.clone();
            let ticket = ticket.clone();
            let position = current_position(&video_ref);
            let player = player.clone();
            spawn_local(async move {
                player.dispatch(notes::create(&client, ticket, &course, draft, position).await);
            });
        })
    };

    let on_delete_note = {
        let client = client.clone();
        let player = player.clone();
        Callback::from(move |note: NoteId| {
            let (Some(client), Some(ticket)) = (client.clone(), player.ticket().cloned()) else {
                return;
            };
            if !platform::confirm("আপনি কি নোটটি মুছে ফেলতে চান?") {
                return;
            }
            let player = player.clone();
            spawn_local(async move {
                player.dispatch(notes::delete(&client, ticket, &note).await);
            });
        })
    };

    let on_close = {
        let player = player.clone();
        Callback::from(move |_| player.dispatch(PlayerAction::DismissError))
    };

    let error = player.error().map(|message| {
        html! { <ErrorModal message={message.to_string()} {on_close} /> }
    });

    let Some(course) = player.course() else {
        return html! {
            <div class="page player">
                <p>{ "লোড হচ্ছে..." }</p>
                { error }
            </div>
        };
    };

    if player.syllabus().is_empty() {
        return html! {
            <div class="page player">
                <header class="header"><h1>{ &course.title }</h1></header>
                <p>{ "এই কোর্সে এখনো কোনো লেসন নেই।" }</p>
                <Link<Route> to={Route::Dashboard}>{ "আমার কোর্সে ফিরে যান" }</Link<Route>>
            </div>
        };
    }

    let lesson_title = player
        .active_lesson()
        .map(|lesson| lesson.title.clone())
        .unwrap_or_default();
    let position = player
        .ticket()
        .and_then(|ticket| player.syllabus().position(&ticket.lesson))
        .map(|(index, total)| format!("লেসন {index} / {total}"))
        .unwrap_or_default();
    let completed = player
        .ticket()
        .is_some_and(|ticket| player.is_completed(&ticket.lesson));
    let status = match player.playback() {
        PlaybackState::Idle | PlaybackState::Playing { .. } => html! {},
        PlaybackState::RequestingUrl(_) | PlaybackState::Attaching { .. } => {
            html! { <p class="status">{ "ভিডিও লোড হচ্ছে..." }</p> }
        }
        PlaybackState::Error { message, .. } => {
            html! { <p class="status error">{ message }</p> }
        }
    };

    html! {
        <div class="page player">
            <header class="header">
                <h1>{ &course.title }</h1>
                if let Some(progress) = player.course_progress() {
                    <ProgressBar value={progress} />
                }
            </header>
            <div class="player-layout">
                <main>
                    <video ref={video_ref} controls=true class="video-player"></video>
                    { status }
                    <div class="lesson-header">
                        <h2>{ lesson_title }</h2>
                        <span>{ position }</span>
                        { quality_selector(&player, on_quality) }
                    </div>
                    <div class="lesson-controls">
                        <button class="btn-primary" disabled={!player.has_previous()} onclick={on_previous}>{ "আগের লেসন" }</button>
                        <button class="btn-primary" disabled={completed} onclick={on_complete}>
                            { if completed { "সম্পন্ন হয়েছে" } else { "সম্পন্ন হিসেবে চিহ্নিত করুন" } }
                        </button>
                        <button class="btn-primary" disabled={!player.has_next()} onclick={on_next}>{ "পরের লেসন" }</button>
                    </div>
                    <NotesPanel notes={player.notes().to_vec()} on_create={on_create_note} on_delete={on_delete_note} />
                </main>
                { syllabus(&player, &on_select) }
            </div>
            { error }
        </div>
    }
}
