macro_rules! nutype_string {
    ($ident:ident($($validate:tt)*)) => {
        #[::nutype::nutype(
            $($validate)*,
            derive(
                Debug,
                Clone,
                PartialEq,
                Eq,
                Hash,
                Deref,
                AsRef,
                TryFrom,
                Display,
                Serialize,
                Deserialize,
            )
        )]
        pub struct $ident(String);
    };
}

pub(crate) use nutype_string;
