use shikkha_api::{Note, NoteId};
use shikkha_client::notes::NoteDraft;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

fn format_timestamp(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(yew::Properties, PartialEq)]
pub struct NotesPanelProps {
    pub notes: Vec<Note>,
    pub on_create: Callback<NoteDraft>,
    pub on_delete: Callback<NoteId>,
}

#[function_component(NotesPanel)]
pub fn notes_panel(
    NotesPanelProps {
        notes,
        on_create,
        on_delete,
    }: &NotesPanelProps,
) -> Html {
    let draft = use_state(NoteDraft::default);

    let on_title = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let title = e.target_unchecked_into::<HtmlInputElement>().value();
            draft.set(NoteDraft {
                title,
                ..(*draft).clone()
            });
        })
    };

    let on_content = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let content = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            draft.set(NoteDraft {
                content,
                ..(*draft).clone()
            });
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let on_create = on_create.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_create.emit((*draft).clone());
            draft.set(NoteDraft::default());
        })
    };

    html! {
        <section class="notes">
            <h3>{ "নোট" }</h3>
            <form {onsubmit}>
                <div class="form-row">
                    <input type="text" placeholder="শিরোনাম" value={draft.title.clone()} oninput={on_title} />
                </div>
                <div class="form-row">
                    <textarea placeholder="নোট লিখুন" value={draft.content.clone()} oninput={on_content} />
                </div>
                <button type="submit" class="btn-primary">{ "নোট যোগ করুন" }</button>
            </form>
            if notes.is_empty() {
                <p>{ "এই লেসনে এখনো কোনো নোট নেই।" }</p>
            } else {
                {
                    notes.iter().map(|note| {
                        let onclick = {
                            let id = note.id.clone();
                            on_delete.reform(move |_: MouseEvent| id.clone())
                        };
                        html! {
                            <div class="card note" key={note.id.to_string()}>
                                <div class="note-header">
                                    <strong>{ &note.title }</strong>
                                    <span class="timestamp">{ format_timestamp(note.timestamp) }</span>
                                </div>
                                <p>{ &note.content }</p>
                                <button class="btn-danger" {onclick}>{ "মুছুন" }</button>
                            </div>
                        }
                    }).collect::<Html>()
                }
            }
        </section>
    }
}
