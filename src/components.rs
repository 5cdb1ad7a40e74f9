//! Pure Yew view components for the capacity calculator.
//!
//! Components render from props only. All text goes through Yew text nodes,
//! which escape it, so labels and values typed by the user never become
//! markup.

use sprint_capacity::presenter::ResultView;
use sprint_capacity::roster::AbsenceRow;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Labelled number input committing its text on change or Enter.
#[derive(Properties, PartialEq)]
pub struct NumberFieldProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub value: String,
    pub min: f64,
    pub max: f64,
    #[prop_or(1.0)]
    pub step: f64,
    /// Text shown after the input, e.g. a unit.
    #[prop_or_default]
    pub suffix: Option<AttrValue>,
    pub oncommit: Callback<String>,
    /// Fired after the commit when Enter is pressed.
    pub onenter: Callback<()>,
}

#[function_component(NumberField)]
pub fn number_field(props: &NumberFieldProps) -> Html {
    let onchange = {
        let oncommit = props.oncommit.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            oncommit.emit(input.value());
        })
    };
    let onkeydown = {
        let oncommit = props.oncommit.clone();
        let onenter = props.onenter.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                let input: HtmlInputElement = e.target_unchecked_into();
                oncommit.emit(input.value());
                onenter.emit(());
            }
        })
    };

    html! {
        <div class="form-group">
            <label for={props.id.clone()}>{ props.label.to_string() }</label>
            <div class="input-with-suffix">
                <input
                    type="number"
                    id={props.id.clone()}
                    min={props.min.to_string()}
                    max={props.max.to_string()}
                    step={props.step.to_string()}
                    value={props.value.clone()}
                    {onchange}
                    {onkeydown}
                />
                if let Some(ref suffix) = props.suffix {
                    <span class="input-suffix">{ suffix.to_string() }</span>
                }
            </div>
        </div>
    }
}

/// One absence input per developer.
#[derive(Properties, PartialEq)]
pub struct AbsenceRowsProps {
    pub rows: Vec<AbsenceRow>,
    /// Upper bound for every row, the current sprint length.
    pub max: f64,
    pub step: f64,
    pub onedit: Callback<(u32, String)>,
    pub onenter: Callback<()>,
}

#[function_component(AbsenceRows)]
pub fn absence_rows(props: &AbsenceRowsProps) -> Html {
    html! {
        <div class="devs-container">
            { props.rows.iter().map(|row| {
                let dev_index = row.dev_index;
                html! {
                    <NumberField
                        key={dev_index.to_string()}
                        id={format!("dev-absence-{}", dev_index)}
                        label={format!("Dev {}", dev_index)}
                        value={row.text.clone()}
                        min={0.0}
                        max={props.max}
                        step={props.step}
                        suffix={AttrValue::from("jours ouvrés")}
                        oncommit={props.onedit.reform(move |text: String| (dev_index, text))}
                        onenter={props.onenter.clone()}
                    />
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Error banner; renders nothing without a message.
#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: Option<String>,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <div id="error-message" class="error-banner" role="alert">{ message.clone() }</div>
        },
        None => html! {},
    }
}

/// Renders the result cards and summary lines.
#[derive(Properties, PartialEq)]
pub struct ResultPanelProps {
    pub view: ResultView,
}

#[function_component(ResultPanel)]
pub fn result_panel(props: &ResultPanelProps) -> Html {
    html! {
        <div id="result" class="results">
            <h2>{ "Résultat" }</h2>
            <div class="result-cards">
                { props.view.cards.iter().map(|card| html! {
                    <div class={card.tone.card_class()}>
                        <div class="result-card-title">{ card.title.clone() }</div>
                        <div class="result-card-value">{ card.value.clone() }</div>
                    </div>
                }).collect::<Html>() }
            </div>
            <div class="result-summary">
                { props.view.summary.iter().map(|line| html! {
                    <div>{ line.clone() }</div>
                }).collect::<Html>() }
            </div>
        </div>
    }
}
