use cartela_core as bingo;
use bingo::ToNdIndex;
use gloo::dialogs::alert;
use gloo::timers::callback::Timeout;
use ndarray::Array2;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::settings::{Settings, SettingsView};
use crate::utils::*;

impl StorageKey for bingo::Roster {
    const KEY: &'static str = "cartela:roster";
}

// Let the marked tile repaint before the blocking dialog.
const BINGO_ALERT_DELAY_MS: u32 = 100;
const STATUS_CLEAR_MS: u32 = 3_000;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Login,
    Logout,
    EditSheet,
    SaveSheet,
    DraftInput(bingo::Coord2, String),
    ActivateTile(bingo::Coord2),
    ClearStatus,
    ToggleSettings,
    UpdateSettings(Settings),
}

#[derive(Properties, Clone, PartialEq)]
struct TileProps {
    row: bingo::Coord,
    col: bingo::Coord,
    text: AttrValue,
    marked: bool,
    filled: bool,
    #[prop_or_default]
    on_win_line: bool,
    callback: Callback<bingo::Coord2>,
}

#[function_component(TileView)]
fn tile_component(props: &TileProps) -> Html {
    let TileProps {
        row,
        col,
        text,
        marked,
        filled,
        on_win_line,
        callback,
    } = props.clone();

    let class = classes!(
        "tile",
        marked.then_some("marked"),
        (!filled).then_some("unfilled"),
        on_win_line.then_some("win"),
    );

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) tile activated", row, col);
        callback.emit((row, col));
    });

    let label = if filled {
        text
    } else {
        AttrValue::from("Empty")
    };

    html! {
        <td {class} {onclick}>{label}</td>
    }
}

pub(crate) struct AppView {
    settings: Settings,
    tracker: bingo::Tracker,
    draft: Option<Array2<String>>,
    username_input: NodeRef,
    status: Option<&'static str>,
    settings_open: bool,
    _status_clear: Option<Timeout>,
    _bingo_alert: Option<Timeout>,
}

impl AppView {
    /// The edit buffer mirrors the active sheet while in the editing phase.
    fn draft_for(tracker: &bingo::Tracker) -> Option<Array2<String>> {
        match tracker.phase() {
            bingo::SessionPhase::Editing => {
                tracker.active_player().map(|player| player.sheet().texts())
            }
            _ => None,
        }
    }

    fn raise_bingo(&mut self) {
        let Some(player) = self.tracker.active_player() else {
            return;
        };
        let username = String::from(player.username());
        let size = player.sheet().size();

        self._bingo_alert = Some(Timeout::new(BINGO_ALERT_DELAY_MS, move || {
            alert(&format!(
                "BINGO! Congratulations, {username}! You got {size} in a row!"
            ));
        }));
    }

    fn clear_status_timer(&self, ctx: &Context<Self>) -> Timeout {
        let link = ctx.link().clone();
        Timeout::new(STATUS_CLEAR_MS, move || link.send_message(Msg::ClearStatus))
    }

    fn view_status(&self) -> Html {
        html! {
            <p class="status">{ self.status.unwrap_or("") }</p>
        }
    }

    fn view_login(&self, ctx: &Context<Self>) -> Html {
        let cb_login = ctx.link().callback(|_| Msg::Login);
        let onkeydown = ctx
            .link()
            .batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Msg::Login));

        html! {
            <section class="login">
                <h1>{"Cartela"}</h1>
                <input
                    ref={self.username_input.clone()}
                    placeholder="Your name"
                    {onkeydown}
                />
                <button onclick={cb_login}>{"Login"}</button>
            </section>
        }
    }

    fn view_editor(&self, ctx: &Context<Self>) -> Html {
        let Some(player) = self.tracker.active_player() else {
            return Html::default();
        };
        let size = player.sheet().size();
        let first_fill = player.sheet().is_empty();

        let cb_save = ctx.link().callback(|_| Msg::SaveSheet);
        let cb_logout = ctx.link().callback(|_| Msg::Logout);

        html! {
            <section class="editor">
                <header>
                    <h1>{ format!("♡ {}'s Bingo Sheet ♡", player.username()) }</h1>
                    <button onclick={cb_logout}>{"Logout"}</button>
                </header>
                if first_fill {
                    <p class="hint">{"Your bingo sheet is empty. Please fill in your phrases."}</p>
                }
                <table class="sheet-input">
                {
                    for (0..size).map(|row| html! {
                        <tr>
                        {
                            for (0..size).map(|col| {
                                let pos = (row, col);
                                let value = self
                                    .draft
                                    .as_ref()
                                    .map(|draft| draft[pos.to_nd_index()].clone())
                                    .unwrap_or_default();
                                let placeholder = format!(
                                    "Phrase {}",
                                    usize::from(row) * usize::from(size) + usize::from(col) + 1
                                );
                                let oninput = ctx.link().callback(move |e: InputEvent| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    Msg::DraftInput(pos, input.value())
                                });
                                html! {
                                    <td><input {value} {placeholder} {oninput}/></td>
                                }
                            })
                        }
                        </tr>
                    })
                }
                </table>
                <button onclick={cb_save}>{"Save Sheet"}</button>
                { self.view_status() }
            </section>
        }
    }

    fn view_play(&self, ctx: &Context<Self>) -> Html {
        let Some(player) = self.tracker.active_player() else {
            return Html::default();
        };
        let sheet = player.sheet();
        let size = sheet.size();
        let win_line = sheet.winning_line();

        let cb_edit = ctx.link().callback(|_| Msg::EditSheet);
        let cb_logout = ctx.link().callback(|_| Msg::Logout);
        let callback = ctx.link().callback(Msg::ActivateTile);

        html! {
            <section class="play">
                <header>
                    <h1>{ format!("♡ {}'s Bingo Sheet ♡", player.username()) }</h1>
                    <button onclick={cb_edit}>{"Edit Sheet"}</button>
                    <button onclick={cb_logout}>{"Logout"}</button>
                </header>
                <table class="sheet">
                {
                    for (0..size).map(|row| html! {
                        <tr>
                        {
                            for (0..size).map(|col| {
                                let pos = (row, col);
                                let tile = sheet.tile_at(pos);
                                let on_win_line =
                                    win_line.is_some_and(|line| line.contains(pos, size));
                                html! {
                                    <TileView
                                        row={row}
                                        col={col}
                                        text={AttrValue::from(String::from(tile.text()))}
                                        marked={tile.is_marked()}
                                        filled={tile.is_filled()}
                                        {on_win_line}
                                        callback={callback.clone()}
                                    />
                                }
                            })
                        }
                        </tr>
                    })
                }
                </table>
                { self.view_status() }
            </section>
        }
    }
}

impl Component for AppView {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let settings = Settings::local_or_default();
        let roster = bingo::Roster::local_or_default();
        let tracker = bingo::Tracker::restore(settings.sheet_config, roster);
        let draft = Self::draft_for(&tracker);

        Self {
            settings,
            tracker,
            draft,
            username_input: NodeRef::default(),
            status: None,
            settings_open: false,
            _status_clear: None,
            _bingo_alert: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Login => {
                let username = self
                    .username_input
                    .cast::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default();
                match self.tracker.login(&username) {
                    Ok(phase) => {
                        log::debug!("login entered {:?}", phase);
                        self.draft = Self::draft_for(&self.tracker);
                        true
                    }
                    Err(bingo::TrackerError::EmptyUsername) => {
                        alert("Please enter your name.");
                        false
                    }
                    Err(err) => {
                        log::error!("login failed: {}", err);
                        false
                    }
                }
            }
            Logout => {
                self.tracker.logout();
                self.draft = None;
                self.status = None;
                true
            }
            EditSheet => match self.tracker.begin_edit() {
                Ok(()) => {
                    self.draft = Self::draft_for(&self.tracker);
                    true
                }
                Err(err) => {
                    log::error!("cannot edit sheet: {}", err);
                    false
                }
            },
            DraftInput(coords, text) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft[coords.to_nd_index()] = text;
                }
                // the input element already shows the text
                false
            }
            SaveSheet => match self.draft.take() {
                None => false,
                Some(texts) => match self.tracker.save_sheet(&texts) {
                    Ok(()) => {
                        self.status = Some("Bingo sheet saved successfully! ( • ̀ω•́ )✧");
                        self._status_clear = Some(self.clear_status_timer(ctx));
                        true
                    }
                    Err(err) => {
                        log::error!("could not save sheet: {}", err);
                        // keep what the user typed
                        self.draft = Some(texts);
                        false
                    }
                },
            },
            ActivateTile(coords) => match self.tracker.activate_tile(coords) {
                Ok(outcome) => {
                    if outcome.is_bingo() {
                        self.raise_bingo();
                    }
                    outcome.has_update()
                }
                Err(err) => {
                    log::error!("tile activation failed: {}", err);
                    false
                }
            },
            ClearStatus => {
                self.status.take().is_some()
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                if !self.settings_open {
                    self.settings = LocalOrDefault::local_or_default();
                    self.tracker.set_sheet_config(self.settings.sheet_config);
                }
                true
            }
            UpdateSettings(settings) => {
                if self.settings != settings {
                    settings.local_save();
                    self.tracker.set_sheet_config(settings.sheet_config);
                    self.settings = settings;
                    true
                } else {
                    false
                }
            }
        };

        self.tracker.roster().local_save();
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use bingo::SessionPhase::*;

        let content = match self.tracker.phase() {
            LoggedOut => self.view_login(ctx),
            Editing => self.view_editor(ctx),
            Playing => self.view_play(ctx),
        };

        let cb_show_settings = ctx.link().callback(|_| Msg::ToggleSettings);

        html! {
            <main class="cartela">
                <small onclick={cb_show_settings}>{"···"}</small>
                { content }
                <SettingsView
                    open={self.settings_open}
                    settings={self.settings}
                    on_change={ctx.link().callback(Msg::UpdateSettings)}
                />
            </main>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_namespaced() {
        assert_eq!(<bingo::Roster as StorageKey>::KEY, "cartela:roster");
        assert_eq!(<Settings as StorageKey>::KEY, "cartela:settings");
    }

    #[test]
    fn login_save_and_mark_through_to_bingo() {
        let mut tracker = bingo::Tracker::new(bingo::SheetConfig::default());
        assert_eq!(
            tracker.login("Alice").unwrap(),
            bingo::SessionPhase::Editing
        );

        let texts =
            Array2::from_shape_fn((4, 4), |(r, c)| format!("phrase {}", r * 4 + c + 1));
        tracker.save_sheet(&texts).unwrap();
        assert_eq!(tracker.phase(), bingo::SessionPhase::Playing);

        for col in 0..3 {
            assert!(!tracker.activate_tile((0, col)).unwrap().is_bingo());
        }
        assert!(tracker.activate_tile((0, 3)).unwrap().is_bingo());
    }

    #[test]
    fn draft_buffer_follows_the_editing_phase() {
        let mut tracker = bingo::Tracker::new(bingo::SheetConfig::default());
        assert!(AppView::draft_for(&tracker).is_none());

        tracker.login("Alice").unwrap();
        let draft = AppView::draft_for(&tracker).unwrap();
        assert_eq!(draft.dim(), (4, 4));
        assert!(draft.iter().all(String::is_empty));

        let texts =
            Array2::from_shape_fn((4, 4), |(r, c)| format!("phrase {}", r * 4 + c + 1));
        tracker.save_sheet(&texts).unwrap();
        assert!(AppView::draft_for(&tracker).is_none());

        tracker.begin_edit().unwrap();
        assert_eq!(AppView::draft_for(&tracker), Some(texts));
    }
}
