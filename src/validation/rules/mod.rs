pub(crate) mod bookkeeping;
pub(crate) mod pairing;
