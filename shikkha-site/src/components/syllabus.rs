use shikkha_api::LessonId;
use shikkha_client::player::CoursePlayer;
use yew::prelude::*;

/// Sections and lessons of the loaded course, highlighting the active and completed lessons.
pub fn syllabus(player: &CoursePlayer, on_select: &Callback<LessonId>) -> Html {
    let Some(course) = player.course() else {
        return html! {};
    };
    let active = player.ticket().map(|t| &t.lesson);

    html! {
        <aside class="syllabus">
        {
            course.sections.iter().map(|section| html! {
                <div class="section" key={section.id.to_string()}>
                    <h4>{ &section.title }</h4>
                    {
                        section.lessons.iter().map(|lesson| {
                            let onclick = {
                                let id = lesson.id.clone();
                                on_select.reform(move |_: MouseEvent| id.clone())
                            };
                            let class = classes!(
                                "lesson",
                                (active == Some(&lesson.id)).then_some("active"),
                                player.is_completed(&lesson.id).then_some("completed"),
                            );
                            html! {
                                <div {class} {onclick} key={lesson.id.to_string()}>
                                    <span>{ &lesson.title }</span>
                                    <span class="duration">{ lesson.duration.clone().unwrap_or_default() }</span>
                                </div>
                            }
                        }).collect::<Html>()
                    }
                </div>
            }).collect::<Html>()
        }
        </aside>
    }
}
