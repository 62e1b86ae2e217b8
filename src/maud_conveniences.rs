use crate::container::{Notice, NoticeKind};
use maud::{Markup, Render, html};

pub fn table<'a>(
    titles: impl IntoIterator<Item = &'a str>,
    items: Vec<Vec<Markup>>,
    empty_message: &str,
) -> Markup {
    let titles: Vec<&str> = titles.into_iter().collect();

    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in &titles {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                        }
                    }
                }
                tbody {
                    @if items.is_empty() {
                        tr {
                            td colspan=(titles.len()) class="text-center py-8 text-gray-400 italic" {(empty_message)}
                        }
                    }
                    @for row in items {
                        tr class="hover:bg-gray-700" {
                            @for col in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn form_element(id: &str, label: &str, required: bool, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-gray-300 text-sm font-bold mb-2" {
                (label)
                @if required {
                    " *"
                }
            }
            (input)
        }
    }
}

pub fn simple_form_element(
    id: &str,
    label: &str,
    required: bool,
    ty: Option<&str>,
    value: &str,
) -> Markup {
    form_element(
        id,
        label,
        required,
        html! {
            input type=(ty.unwrap_or("text")) id=(id) name=(id) value=(value) required[required] class=(INPUT_CLASSES);
        },
    )
}

pub fn textarea_element(id: &str, label: &str, value: &str) -> Markup {
    form_element(
        id,
        label,
        false,
        html! {
            textarea id=(id) name=(id) rows="3" class="w-full bg-gray-700 text-gray-100 rounded px-4 py-2 border border-gray-600 focus:outline-none focus:ring focus:ring-blue-500 placeholder-gray-400 resize-y" {(value)}
        },
    )
}

///`placeholder` becomes a disabled first option, picked while nothing else is
pub fn select_element<'a>(
    id: &str,
    label: &str,
    required: bool,
    placeholder: Option<&str>,
    options: impl IntoIterator<Item = (String, &'a str)>,
    selected: &str,
) -> Markup {
    form_element(
        id,
        label,
        required,
        html! {
            select id=(id) name=(id) required[required] class=(INPUT_CLASSES) {
                @if let Some(placeholder) = placeholder {
                    option value="" disabled selected[selected.is_empty()] {(placeholder)}
                }
                @for (value, text) in options {
                    option value=(value) selected[value == selected] {(text)}
                }
            }
        },
    )
}

pub fn form_submit_button(text: &str) -> Markup {
    html! {
        button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
            (text)
        }
    }
}

pub fn error_alert(message: impl Render) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
            (message)
        }
    }
}

pub fn notification(notice: &Notice) -> Markup {
    let colour = match notice.kind {
        NoticeKind::Success => "bg-green-600",
        NoticeKind::Error => "bg-red-600",
    };

    html! {
        div class={"fixed top-5 right-5 p-4 rounded-lg shadow-lg text-white z-50 " (colour)} role="status" {
            span {(notice.message)}
            button type="button" class="ml-4 font-bold" onclick="this.parentElement.remove()" {"X"}
        }
    }
}
