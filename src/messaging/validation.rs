use crate::error::ValidationError;
use crate::messaging::contracts::ChargeRequestMessage;
use rust_decimal::Decimal;

/// ISO-4217 minor-unit count for a currency code. Unknown codes are
/// rejected rather than defaulted.
pub fn minor_units(currency: &str) -> Option<u32> {
    match currency {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF"
        | "UGX" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => Some(0),
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => Some(3),
        "AED" | "ARS" | "AUD" | "BRL" | "CAD" | "CHF" | "CNY" | "COP" | "CZK" | "DKK"
        | "EGP" | "EUR" | "GBP" | "HKD" | "HUF" | "IDR" | "ILS" | "INR" | "KES" | "MXN"
        | "MYR" | "NGN" | "NOK" | "NZD" | "PEN" | "PHP" | "PKR" | "PLN" | "RON" | "RUB"
        | "SAR" | "SEK" | "SGD" | "THB" | "TRY" | "TWD" | "UAH" | "USD" | "UYU" | "ZAR" => {
            Some(2)
        }
        _ => None,
    }
}

/// Validation contract applied by listeners before a handler runs: amount
/// and currency present, amount non-negative, and the amount's decimal
/// scale matching the currency's minor-unit count.
pub fn validate_charge_request(message: &ChargeRequestMessage) -> Result<(), ValidationError> {
    if message.currency.trim().is_empty() {
        return Err(ValidationError::CurrencyMissing);
    }

    if message.amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount(message.amount));
    }

    let expected = minor_units(&message.currency)
        .ok_or_else(|| ValidationError::UnknownCurrency(message.currency.clone()))?;
    if message.amount.scale() != expected {
        return Err(ValidationError::ScaleMismatch {
            currency: message.currency.clone(),
            expected,
            actual: message.amount.scale(),
        });
    }

    Ok(())
}
