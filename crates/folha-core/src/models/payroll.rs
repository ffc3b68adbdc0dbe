//! Payroll record model: one row per employee found on a holerite.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::rules::amounts::{format_brl_amount, parse_brl_amount, patronal_contribution};
use crate::rules::patterns::{BRL_AMOUNT, EMPLOYEE_CODE};

/// Value used for any field the source document does not carry.
pub const PLACEHOLDER: &str = "-";

/// Number of columns in a payroll record.
pub const FIELD_COUNT: usize = 25;

/// What kind of value a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Numeric employee code.
    Identifier,
    /// Employee name.
    Name,
    /// Currency amount formatted as in the source (`1.234,56`).
    Amount,
}

/// Static description of one record column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// JSON key used in the provider schema and in records.
    pub key: &'static str,
    /// Header shown in the table and the CSV export.
    pub label: &'static str,
    /// Field description sent to the provider.
    pub description: &'static str,
    /// Value kind.
    pub kind: ColumnKind,
}

const fn amount(key: &'static str, label: &'static str, description: &'static str) -> Column {
    Column {
        key,
        label,
        description,
        kind: ColumnKind::Amount,
    }
}

/// All record columns in schema order.
pub const COLUMNS: [Column; FIELD_COUNT] = [
    Column {
        key: "id",
        label: "ID",
        description: "Código numérico do funcionário",
        kind: ColumnKind::Identifier,
    },
    Column {
        key: "nome",
        label: "Nome",
        description: "Nome do funcionário",
        kind: ColumnKind::Name,
    },
    amount("salario", "SALÁRIO", "Salário base"),
    amount("arredon", "ARREDON.", "Arredondamento"),
    amount("he_70", "H.E. 70%", "Horas extras 70%"),
    amount("refl_70", "REFL. 70%", "Reflexo das horas extras 70%"),
    amount("he_100", "H.E. 100%", "Horas extras 100%"),
    amount("refl_100", "REFL. 100%", "Reflexo das horas extras 100%"),
    amount("ferias_prop", "FÉRIAS PROP.", "Férias proporcionais"),
    amount("terco_ferias", "1/3 FÉRIAS", "Um terço de férias"),
    amount(
        "adicionais",
        "ADICIONAIS",
        "Adicionais (insalubridade, periculosidade, etc.)",
    ),
    amount("outros_venc", "OUTROS VENC.", "Outros vencimentos"),
    amount("inss_seg", "I.N.S.S. (Seg.)", "I.N.S.S. do segurado"),
    amount(
        "contrib_negoc",
        "CONTRIB. NEGOC.",
        "Contribuição negocial ou assistencial",
    ),
    amount("faltas_injust", "FALTAS INJUST.", "Faltas injustificadas"),
    amount(
        "indeniz",
        "INDENIZ.",
        "Indenizações e verbas rescisórias (aviso prévio, etc.)",
    ),
    amount("adiant", "ADIANT.", "Adiantamento salarial"),
    amount("vale_transp", "VALE TRANSP. (6%)", "Vale transporte (6%)"),
    amount("irrf", "IRRF", "Imposto de renda retido na fonte"),
    amount("outros_desc", "OUTROS DESC.", "Outros descontos"),
    amount("depos_fgts", "DEPÓS. FGTS", "Depósito do FGTS"),
    amount("base_calc_inss", "BASE CÁLC. INSS", "Base de cálculo do I.N.S.S."),
    amount("base_calc_fgts", "BASE CÁLC. FGTS", "Base de cálculo do FGTS"),
    amount("base_calc_irrf", "BASE CÁLC. IRRF", "Base de cálculo do IRRF"),
    amount(
        "inss_patronal_20",
        "INSS PATRONAL (20%)",
        "INSS patronal: 20% da base de cálculo do I.N.S.S.",
    ),
];

/// Column keys in schema order.
pub fn column_keys() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|c| c.key)
}

/// Column labels in schema order.
pub fn column_labels() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|c| c.label)
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// Absent, null and blank values all collapse to the placeholder.
fn text_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => placeholder(),
    })
}

/// One employee row extracted from a payroll document.
///
/// Every field is text. Amounts keep the formatting of the source document
/// and missing values are [`PLACEHOLDER`]. Field declaration order is the
/// schema order, so serialization emits keys in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub id: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub nome: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub salario: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub arredon: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub he_70: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub refl_70: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub he_100: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub refl_100: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub ferias_prop: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub terco_ferias: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub adicionais: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub outros_venc: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub inss_seg: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub contrib_negoc: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub faltas_injust: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub indeniz: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub adiant: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub vale_transp: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub irrf: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub outros_desc: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub depos_fgts: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub base_calc_inss: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub base_calc_fgts: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub base_calc_irrf: String,
    #[serde(default = "placeholder", deserialize_with = "text_or_placeholder")]
    pub inss_patronal_20: String,
}

impl Default for PayrollRecord {
    /// A record with every field set to the placeholder.
    fn default() -> Self {
        Self {
            id: placeholder(),
            nome: placeholder(),
            salario: placeholder(),
            arredon: placeholder(),
            he_70: placeholder(),
            refl_70: placeholder(),
            he_100: placeholder(),
            refl_100: placeholder(),
            ferias_prop: placeholder(),
            terco_ferias: placeholder(),
            adicionais: placeholder(),
            outros_venc: placeholder(),
            inss_seg: placeholder(),
            contrib_negoc: placeholder(),
            faltas_injust: placeholder(),
            indeniz: placeholder(),
            adiant: placeholder(),
            vale_transp: placeholder(),
            irrf: placeholder(),
            outros_desc: placeholder(),
            depos_fgts: placeholder(),
            base_calc_inss: placeholder(),
            base_calc_fgts: placeholder(),
            base_calc_irrf: placeholder(),
            inss_patronal_20: placeholder(),
        }
    }
}

impl PayrollRecord {
    /// Field values in schema order.
    pub fn values(&self) -> [&str; FIELD_COUNT] {
        [
            self.id.as_str(),
            self.nome.as_str(),
            self.salario.as_str(),
            self.arredon.as_str(),
            self.he_70.as_str(),
            self.refl_70.as_str(),
            self.he_100.as_str(),
            self.refl_100.as_str(),
            self.ferias_prop.as_str(),
            self.terco_ferias.as_str(),
            self.adicionais.as_str(),
            self.outros_venc.as_str(),
            self.inss_seg.as_str(),
            self.contrib_negoc.as_str(),
            self.faltas_injust.as_str(),
            self.indeniz.as_str(),
            self.adiant.as_str(),
            self.vale_transp.as_str(),
            self.irrf.as_str(),
            self.outros_desc.as_str(),
            self.depos_fgts.as_str(),
            self.base_calc_inss.as_str(),
            self.base_calc_fgts.as_str(),
            self.base_calc_irrf.as_str(),
            self.inss_patronal_20.as_str(),
        ]
    }

    /// Look up a field by its schema key.
    pub fn get(&self, key: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|c| c.key == key)
            .map(|i| self.values()[i])
    }

    /// Check the record against the extraction rules and return any issues found.
    ///
    /// The record is never modified; callers decide what to do with the issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.id != PLACEHOLDER && !EMPLOYEE_CODE.is_match(&self.id) {
            issues.push(format!("ID '{}' is not a numeric employee code", self.id));
        }

        if self.nome == PLACEHOLDER {
            issues.push(format!("Employee {} has no name", self.id));
        }

        for (column, value) in COLUMNS.iter().zip(self.values()) {
            if column.kind == ColumnKind::Amount
                && value != PLACEHOLDER
                && !BRL_AMOUNT.is_match(value)
            {
                issues.push(format!(
                    "{} of employee {} is not a formatted amount: '{}'",
                    column.key, self.id, value
                ));
            }
        }

        if let Some(issue) = self.check_patronal() {
            issues.push(issue);
        }

        issues
    }

    fn check_patronal(&self) -> Option<String> {
        let base_missing = self.base_calc_inss == PLACEHOLDER;
        let patronal_missing = self.inss_patronal_20 == PLACEHOLDER;

        match (base_missing, patronal_missing) {
            (true, true) => None,
            (true, false) => Some(format!(
                "inss_patronal_20 of employee {} is set but base_calc_inss is missing",
                self.id
            )),
            (false, true) => Some(format!(
                "inss_patronal_20 of employee {} is missing but base_calc_inss is {}",
                self.id, self.base_calc_inss
            )),
            (false, false) => {
                // Bases that do not parse are already reported as format issues.
                let base = parse_brl_amount(&self.base_calc_inss)?;
                let expected = patronal_contribution(base);
                match parse_brl_amount(&self.inss_patronal_20) {
                    Some(actual) if (actual - expected).abs() <= Decimal::new(1, 2) => None,
                    _ => Some(format!(
                        "inss_patronal_20 of employee {} is {} but 20% of {} is {}",
                        self.id,
                        self.inss_patronal_20,
                        self.base_calc_inss,
                        format_brl_amount(expected)
                    )),
                }
            }
        }
    }
}
