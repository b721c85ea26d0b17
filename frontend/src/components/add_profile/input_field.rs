use leptos::prelude::*;
use profile_soup_shared::validation::field_label;

/// 带标签与错误提示的文本输入框，标签为首字母大写的字段名
#[component]
pub fn InputField(
    #[prop(into)] name: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    /// 仅在提交过一次后才显示
    #[prop(into)]
    error: Signal<Option<String>>,
) -> impl IntoView {
    let label = field_label(&name);
    let id = format!("field-{}", name);

    view! {
        <fieldset class="fieldset w-full">
            <label for=id.clone() class="label">
                <span class="label-text">{label.clone()}</span>
            </label>
            <input
                id=id
                name=name
                type="text"
                placeholder=label
                class=move || {
                    if error.with(Option::is_some) {
                        "input input-bordered input-error w-full"
                    } else {
                        "input input-bordered w-full"
                    }
                }
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
            <Show when=move || error.with(Option::is_some)>
                <p class="label text-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
        </fieldset>
    }
}
