use crate::{
    api::Backend,
    data::{
        Directory, Entity, EntityKind,
        wire::{self, input_date, parse_date},
    },
    error::AcademiaResult,
};
use async_trait::async_trait;
use jiff::{Zoned, civil::Date};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Money, held as centavos.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn from_reais(reais: f64) -> Option<Self> {
        reais
            .is_finite()
            .then(|| Self::from_cents((reais * 100.0).round() as i64))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_reais(self) -> f64 {
        self.cents as f64 / 100.0
    }

    ///what an `<input type="number" step="0.01">` wants
    pub fn input_value(self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

///a dot followed by groups of exactly three digits, as in `1.234` or `12.345.678`
fn is_grouped_thousands(s: &str) -> bool {
    let mut groups = s.split('.');
    let head = groups.next().unwrap_or_default();
    let all_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());

    s.contains('.')
        && (1..=3).contains(&head.len())
        && all_digits(head)
        && groups.all(|group| group.len() == 3 && all_digits(group))
}

///accepts `150`, `150.5`, `1.234`, `1.234,56` and `R$ 99,90`
impl FromStr for Amount {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().trim_start_matches("R$").trim();
        let normalised = if cleaned.contains(',') {
            cleaned.replace('.', "").replace(',', ".")
        } else if is_grouped_thousands(cleaned) {
            cleaned.replace('.', "")
        } else {
            cleaned.to_string()
        };
        let reais: f64 = normalised.parse().map_err(|_| ())?;
        Self::from_reais(reais).ok_or(())
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        let reais = (abs / 100).to_string();

        let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
        for (i, digit) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        write!(f, "{sign}R$ {grouped},{:02}", abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_reais())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        //DECIMAL columns tend to arrive as strings
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::from_reais(n).ok_or_else(|| D::Error::custom("non-finite amount")),
            Raw::Text(s) => s
                .parse()
                .map_err(|()| D::Error::custom(format!("invalid amount {s:?}"))),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Pix,
    CartaoCredito,
    CartaoDebito,
    Dinheiro,
}

impl PaymentMethod {
    pub const ALL: [Self; 4] = [Self::Pix, Self::CartaoCredito, Self::CartaoDebito, Self::Dinheiro];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::CartaoCredito => "cartao_credito",
            Self::CartaoDebito => "cartao_debito",
            Self::Dinheiro => "dinheiro",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::CartaoCredito => "Cartão de Crédito",
            Self::CartaoDebito => "Cartão de Débito",
            Self::Dinheiro => "Dinheiro",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|method| method.code() == s).ok_or(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(alias = "id_pagamento")]
    pub id: i64,
    pub aluno_id: i64,
    #[serde(with = "wire::date")]
    pub data_pagamento: Date,
    pub valor: Amount,
    #[serde(default)]
    pub metodo_pagamento: PaymentMethod,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentDraft {
    pub aluno_id: i64,
    #[serde(with = "wire::date")]
    pub data_pagamento: Date,
    pub valor: Amount,
    pub metodo_pagamento: PaymentMethod,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    pub aluno_id: String,
    pub data_pagamento: String,
    pub valor: String,
    pub metodo_pagamento: String,
}

#[async_trait]
impl Entity for Payment {
    type Draft = PaymentDraft;
    type Form = PaymentForm;
    ///the students, so rows and the form can show names
    type Lookups = Directory;

    const KIND: EntityKind = EntityKind::Payments;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> PaymentForm {
        PaymentForm {
            aluno_id: self.aluno_id.to_string(),
            data_pagamento: input_date(self.data_pagamento),
            valor: self.valor.input_value(),
            metodo_pagamento: self.metodo_pagamento.code().to_string(),
        }
    }

    fn blank_form(students: &Directory) -> PaymentForm {
        PaymentForm {
            aluno_id: students.first_id().map(|id| id.to_string()).unwrap_or_default(),
            data_pagamento: input_date(Zoned::now().date()),
            valor: String::new(),
            metodo_pagamento: PaymentMethod::default().code().to_string(),
        }
    }

    fn validate(form: &PaymentForm, students: &Directory) -> Result<PaymentDraft, Vec<String>> {
        let mut problems = vec![];

        let aluno_id = match form.aluno_id.trim().parse::<i64>() {
            Ok(id) if id > 0 => {
                if !students.is_empty() && !students.contains(id) {
                    problems.push("Aluno não encontrado.".to_string());
                }
                Some(id)
            }
            _ => {
                problems.push("Por favor, selecione um aluno.".to_string());
                None
            }
        };
        let data_pagamento = parse_date(&form.data_pagamento)
            .inspect_err(|_| problems.push("Data do pagamento inválida.".to_string()))
            .ok();
        let valor = form.valor.parse::<Amount>().ok().filter(|valor| valor.cents() > 0);
        if valor.is_none() {
            problems.push("O valor do pagamento deve ser maior que zero.".to_string());
        }
        let metodo_pagamento = form
            .metodo_pagamento
            .parse::<PaymentMethod>()
            .inspect_err(|()| problems.push("Método de pagamento inválido.".to_string()))
            .ok();

        match (aluno_id, data_pagamento, valor, metodo_pagamento) {
            (Some(aluno_id), Some(data_pagamento), Some(valor), Some(metodo_pagamento))
                if problems.is_empty() =>
            {
                Ok(PaymentDraft {
                    aluno_id,
                    data_pagamento,
                    valor,
                    metodo_pagamento,
                })
            }
            _ => Err(problems),
        }
    }

    fn from_draft(id: i64, draft: PaymentDraft) -> Self {
        Self {
            id,
            aluno_id: draft.aluno_id,
            data_pagamento: draft.data_pagamento,
            valor: draft.valor,
            metodo_pagamento: draft.metodo_pagamento,
        }
    }

    async fn load_lookups<B: Backend + ?Sized>(backend: &B) -> AcademiaResult<Directory> {
        backend.directory(EntityKind::Students).await
    }
}
