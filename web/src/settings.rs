use cartela_core as bingo;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::theme::Theme;
use crate::utils::*;

/// Options for sheets created from now on; existing players keep theirs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub sheet_config: bingo::SheetConfig,
}

impl StorageKey for Settings {
    const KEY: &'static str = "cartela:settings";
}

const SHEET_SIZES: &[bingo::Coord] = &[3, 4, 5];

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub settings: Settings,
    pub on_change: Callback<Settings>,
}

#[function_component(SettingsView)]
pub(crate) fn settings_view(props: &SettingsProps) -> Html {
    let current_size = props.settings.sheet_config.size;

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"Settings"}</h2>
                <p>{"Sheet size for new players"}</p>
                <ul>
                {
                    for SHEET_SIZES.iter().map(|&size| {
                        let on_change = props.on_change.clone();
                        let onclick = Callback::from(move |_: MouseEvent| {
                            on_change.emit(Settings {
                                sheet_config: bingo::SheetConfig::new(size),
                            });
                        });
                        html! {
                            <li>
                                <button
                                    class={classes!((size == current_size).then_some("current"))}
                                    {onclick}
                                >
                                    { format!("{0}×{0}", size) }
                                </button>
                            </li>
                        }
                    })
                }
                </ul>
                <p>{"Theme"}</p>
                <ul>
                    <li><a href="#" onclick={theme_switcher(Theme::Auto)}>{"Auto"}</a></li>
                    <li><a href="#" onclick={theme_switcher(Theme::Light)}>{"Light"}</a></li>
                    <li><a href="#" onclick={theme_switcher(Theme::Dark)}>{"Dark"}</a></li>
                </ul>
            </article>
        </dialog>
    }
}

fn theme_switcher(theme: Theme) -> Callback<MouseEvent> {
    Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        Theme::apply(theme);
    })
}
