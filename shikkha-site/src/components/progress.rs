use shikkha_api::Percent;
use yew::prelude::*;

#[derive(yew::Properties, PartialEq)]
pub struct ProgressBarProps {
    pub value: Percent,
}

#[function_component(ProgressBar)]
pub fn progress_bar(ProgressBarProps { value }: &ProgressBarProps) -> Html {
    let style = format!("width: {}%;", value.get());

    html! {
        <div class="progress">
            <div class="progress-bar-container">
                <div class="progress-bar" {style}></div>
            </div>
            <span>{ format!("{value} সম্পন্ন") }</span>
        </div>
    }
}
