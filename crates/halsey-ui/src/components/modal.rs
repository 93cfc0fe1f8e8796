use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub(crate) open: bool,
    #[prop_or_default]
    pub(crate) class: Classes,
    #[prop_or_default]
    pub(crate) children: Children,
    #[prop_or_default]
    pub(crate) on_close: Callback<()>,
    /// Ignore backdrop clicks while an action is running.
    #[prop_or_default]
    pub(crate) locked: bool,
}

#[function_component(Modal)]
pub(crate) fn modal(props: &ModalProps) -> Html {
    let classes = classes!(
        "modal",
        props.open.then_some("modal-open"),
        props.class.clone()
    );

    let on_close = {
        let on_close = props.on_close.clone();
        let locked = props.locked;
        Callback::from(move |_| {
            if !locked {
                on_close.emit(());
            }
        })
    };

    html! {
        <div class={classes} role="dialog" aria-modal="true">
            <div class="modal-box">
                { for props.children.iter() }
            </div>
            <button class="modal-backdrop" onclick={on_close}></button>
        </div>
    }
}
