//! Main module for the sprint capacity calculator using Yew.
//! Wires the form controller to UI components and browser storage.

use log::{info, warn};
use sprint_capacity::config::*;
use sprint_capacity::presenter::ResultView;
use sprint_capacity::storage::LocalStorage;
use sprint_capacity::validation::parse_number;
use sprint_capacity::{Field, FormController, FormEvent, Outcome, SettingsStore, Validator};
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod hooks;

use components::{AbsenceRows, ErrorBanner, NumberField, ResultPanel};
use hooks::use_dismissable_message;

/// Helper to bump the revision counter and trigger a UI re-render
fn bump_revision(revision: &UseStateHandle<usize>) {
    revision.set(revision.wrapping_add(1));
}

/// Primary application component wiring the controller, effects, and UI.
#[function_component(App)]
fn app() -> Html {
    let controller = use_mut_ref(|| {
        FormController::new(Validator::default(), SettingsStore::new(LocalStorage))
    });
    // Revision state re-renders the form after the controller's draft changes
    let revision = use_state(|| 0usize);
    let result_view = use_state(|| None::<ResultView>);
    let error = use_dismissable_message(ERROR_DISMISS_MS);

    let dispatch = {
        let controller = controller.clone();
        let revision = revision.clone();
        let result_view = result_view.clone();
        let show_error = error.show.clone();
        let hide_error = error.hide.clone();
        Callback::from(move |event: FormEvent| {
            let outcome = controller.borrow_mut().handle(event);
            match outcome {
                Outcome::Computed(report) => {
                    result_view.set(Some(ResultView::new(&report)));
                    hide_error.emit(());
                }
                Outcome::Invalid(e) => {
                    warn!("Rejected input: {}", e);
                    show_error.emit(e.to_string());
                }
                Outcome::RowsRegenerated => hide_error.emit(()),
                Outcome::Updated => {}
            }
            bump_revision(&revision);
        })
    };

    let on_field = |field: Field| dispatch.reform(move |text: String| FormEvent::Edit(field, text));
    let on_default =
        |field: Field| dispatch.reform(move |text: String| FormEvent::EditDefault(field, text));
    let on_enter_defaults = dispatch.reform(|_: ()| FormEvent::ApplyDefaults);
    let on_enter = dispatch.reform(|_: ()| FormEvent::Calculate);
    let on_absence = dispatch.reform(|(dev_index, text): (u32, String)| FormEvent::EditAbsence {
        dev_index,
        text,
    });
    let on_remember = dispatch.reform(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        FormEvent::SetRemember(input.checked())
    });
    let on_calculate = dispatch.reform(|_: MouseEvent| FormEvent::Calculate);
    let on_defaults = dispatch.reform(|_: MouseEvent| FormEvent::ApplyDefaults);

    // Ensure re-render on draft updates
    let _ = *revision;
    let draft = controller.borrow().draft().clone();
    let absence_max = parse_number(&draft.sprint_days).unwrap_or(MAX_SPRINT_DAYS);

    html! {
        <div class="container">
            <h1>{ "Calculateur de capacité de sprint" }</h1>

            <div class="team-fields">
                <NumberField
                    id="velocity"
                    label="Vélocité (points / sprint)"
                    value={draft.velocity.clone()}
                    min={MIN_VELOCITY}
                    max={MAX_VELOCITY}
                    oncommit={on_field(Field::Velocity)}
                    onenter={on_enter.clone()}
                />
                <NumberField
                    id="devCount"
                    label="Nombre de développeurs"
                    value={draft.dev_count.clone()}
                    min={MIN_DEV_COUNT as f64}
                    max={MAX_DEV_COUNT as f64}
                    oncommit={on_field(Field::DevCount)}
                    onenter={on_enter.clone()}
                />
                <NumberField
                    id="sprintDays"
                    label="Jours ouvrés du sprint"
                    value={draft.sprint_days.clone()}
                    min={MIN_SPRINT_DAYS}
                    max={MAX_SPRINT_DAYS}
                    oncommit={on_field(Field::SprintDays)}
                    onenter={on_enter.clone()}
                />
                <NumberField
                    id="buildPercent"
                    label="Part build (%)"
                    value={draft.build_percent.clone()}
                    min={MIN_BUILD_PCT}
                    max={MAX_BUILD_PCT}
                    oncommit={on_field(Field::BuildPercent)}
                    onenter={on_enter.clone()}
                />
            </div>

            <div class="absences-section">
                <h2>{ "Absences" }</h2>
                if draft.roster.is_empty() {
                    <p class="hint">{ "Aucun développeur dans l'équipe." }</p>
                } else {
                    <AbsenceRows
                        rows={draft.roster.rows().to_vec()}
                        max={absence_max}
                        step={ABSENCE_STEP}
                        onedit={on_absence}
                        onenter={on_enter}
                    />
                }
            </div>

            <div class="defaults-section">
                <h2>{ "Valeurs par défaut" }</h2>
                <NumberField
                    id="defaultVelocity"
                    label="Vélocité par défaut"
                    value={draft.defaults.velocity.clone()}
                    min={MIN_VELOCITY}
                    max={MAX_VELOCITY}
                    oncommit={on_default(Field::Velocity)}
                    onenter={on_enter_defaults.clone()}
                />
                <NumberField
                    id="defaultDevCount"
                    label="Développeurs par défaut"
                    value={draft.defaults.dev_count.clone()}
                    min={MIN_DEV_COUNT as f64}
                    max={MAX_DEV_COUNT as f64}
                    oncommit={on_default(Field::DevCount)}
                    onenter={on_enter_defaults.clone()}
                />
                <NumberField
                    id="defaultSprintDays"
                    label="Jours ouvrés par défaut"
                    value={draft.defaults.sprint_days.clone()}
                    min={MIN_SPRINT_DAYS}
                    max={MAX_SPRINT_DAYS}
                    oncommit={on_default(Field::SprintDays)}
                    onenter={on_enter_defaults.clone()}
                />
                <NumberField
                    id="defaultBuildPercent"
                    label="Part build par défaut (%)"
                    value={draft.defaults.build_percent.clone()}
                    min={MIN_BUILD_PCT}
                    max={MAX_BUILD_PCT}
                    oncommit={on_default(Field::BuildPercent)}
                    onenter={on_enter_defaults}
                />
            </div>

            <div class="form-group checkbox-group">
                <label>
                    <input type="checkbox"
                        id="rememberSettings"
                        checked={draft.remember}
                        onchange={on_remember}
                    />
                    { "Se souvenir de mes paramètres" }
                </label>
            </div>

            <ErrorBanner message={error.message.clone()} />

            <div class="actions">
                <button id="calcBtn" class="btn-primary" onclick={on_calculate}>
                    { "Calculer la capacité" }
                </button>
                <button id="applyDefaults" class="btn-secondary" onclick={on_defaults}>
                    { "Appliquer les valeurs par défaut" }
                </button>
            </div>

            // Results section
            <div class="results-area">
                if let Some(ref view) = *result_view {
                    <ResultPanel view={view.clone()} />
                }
            </div>
        </div>
    }
}

/// Entry point: installs logging and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    info!("Sprint capacity calculator starting");
    yew::Renderer::<App>::new().render();
}
