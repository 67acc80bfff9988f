pub mod numeric;
pub mod qualification;
pub mod savings;
pub mod tariff_cache;
