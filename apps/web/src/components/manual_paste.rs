//! Manual paste dialog
//!
//! Last link of the local → remote chain, shown when the browser would not
//! hand over its clipboard.

use leptos::*;
use web_sys::ClipboardEvent;

#[component]
pub fn ManualPasteDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] pending: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(into)] on_paste: Callback<String>,
    #[prop(into)] on_submit: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <ManualPasteForm
                pending=pending
                on_input=on_input
                on_paste=on_paste
                on_submit=on_submit
                on_cancel=on_cancel
            />
        </Show>
    }
}

#[component]
fn ManualPasteForm(
    pending: Signal<String>,
    on_input: Callback<String>,
    on_paste: Callback<String>,
    on_submit: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let field = create_node_ref::<html::Textarea>();

    field.on_load(|textarea| {
        // wait for the node to be attached before focusing it
        request_animation_frame(move || {
            let _ = textarea.focus();
            textarea.select();
        });
    });

    let handle_paste = move |ev: ClipboardEvent| {
        let Some(text) = ev
            .clipboard_data()
            .and_then(|data| data.get_data("text/plain").ok())
        else {
            return;
        };
        ev.prevent_default();
        on_paste.call(text);
    };

    let handle_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        on_submit.call(());
    };

    view! {
        <div class="paste-dialog-backdrop">
            <form class="paste-dialog" on:submit=handle_submit>
                <label class="paste-dialog-label" for="manual-paste">
                    "Paste text to send to the remote session"
                </label>
                <textarea
                    id="manual-paste"
                    class="paste-dialog-field"
                    rows="4"
                    node_ref=field
                    prop:value=move || pending.get()
                    on:input=move |ev| on_input.call(event_target_value(&ev))
                    on:paste=handle_paste
                    on:keydown=move |ev| {
                        if ev.key() == "Escape" {
                            on_cancel.call(());
                        }
                    }
                />
                <div class="paste-dialog-actions">
                    <button type="button" class="paste-dialog-cancel" on:click=move |_| on_cancel.call(())>
                        "Cancel"
                    </button>
                    <button type="submit" class="paste-dialog-submit">
                        "Paste"
                    </button>
                </div>
            </form>
        </div>
    }
}
