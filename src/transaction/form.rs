use maud::{Markup, html};
use time::Date;

use crate::{
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::TransactionType,
};

pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub category: Option<&'a str>,
    pub date: Date,
    pub reference: Option<&'a str>,
    pub description: Option<&'a str>,
    pub max_date: Date,
    pub autofocus_amount: bool,
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{:.2}", amount.abs()));
    let amount_placeholder = amount_str.as_deref().unwrap_or("0.01");

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-expense"
                        type="radio"
                        value="expense"
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-income"
                        type="radio"
                        value="income"
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder=(amount_placeholder)
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                placeholder="e.g. Groceries"
                required
                value=[defaults.category]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="reference"
                class=(FORM_LABEL_STYLE)
            {
                "Reference"
            }

            input
                name="reference"
                id="reference"
                type="text"
                placeholder="e.g. an invoice number"
                value=[defaults.reference]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use super::{TransactionFormDefaults, transaction_form_fields};
    use crate::transaction::core::TransactionType;

    #[test]
    fn transaction_form_fields_checks_selected_type() {
        let cases = [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ];

        for (transaction_type, expected) in cases {
            let html = render_fields(transaction_type);
            assert_checked_value(&html, expected);
        }
    }

    #[test]
    fn transaction_form_fields_requires_category() {
        let html = render_fields(TransactionType::Expense);

        let selector = Selector::parse("input[name=category]").unwrap();
        let category_input = html
            .select(&selector)
            .next()
            .expect("No category input found");
        assert!(
            category_input.value().attr("required").is_some(),
            "want category input to be required"
        );
    }

    fn render_fields(transaction_type: TransactionType) -> Html {
        let max_date = OffsetDateTime::now_utc().date();
        let fields = transaction_form_fields(&TransactionFormDefaults {
            transaction_type,
            amount: None,
            category: None,
            date: max_date,
            reference: None,
            description: None,
            max_date,
            autofocus_amount: false,
        });
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }

    fn assert_checked_value(document: &Html, expected: &str) {
        let selector = Selector::parse("input[type=radio][name=type_]").unwrap();
        let inputs = document.select(&selector).collect::<Vec<_>>();
        assert_eq!(
            inputs.len(),
            2,
            "want 2 transaction type inputs, got {}",
            inputs.len()
        );

        let checked = inputs
            .iter()
            .find(|input| input.value().attr("checked").is_some())
            .and_then(|input| input.value().attr("value"));
        assert_eq!(
            checked,
            Some(expected),
            "want checked transaction type to be {expected}, got {checked:?}"
        );
    }
}
