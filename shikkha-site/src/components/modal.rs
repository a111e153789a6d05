use yew::prelude::*;

#[derive(yew::Properties, PartialEq)]
pub struct ErrorModalProps {
    pub message: AttrValue,
    pub on_close: Callback<()>,
}

/// Modal showing a failure to the user
#[function_component(ErrorModal)]
pub fn error_modal(ErrorModalProps { message, on_close }: &ErrorModalProps) -> Html {
    let onclick = on_close.reform(|_: MouseEvent| ());

    html! {
        <div class="modal-backdrop">
            <div class="modal" role="alertdialog">
                <h3>{ "ত্রুটি" }</h3>
                <p>{ message.clone() }</p>
                <button class="btn-primary" {onclick}>{ "ঠিক আছে" }</button>
            </div>
        </div>
    }
}
