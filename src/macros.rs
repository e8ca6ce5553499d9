#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`Selection`](crate::Selection) from facet-keyed literals.
///
/// ```
/// let sel = paddock::selection! { category: ["oval"], series: [10, 11], car: [100] };
/// assert_eq!(sel.len(), 4);
/// ```
#[macro_export]
macro_rules! selection {
    (@value category, $v:expr) => {
        $crate::FacetValue::Category($crate::CategoryCode::parse($v).expect("valid category code"))
    };
    (@value series, $v:expr) => {
        $crate::FacetValue::Series($v)
    };
    (@value car_class, $v:expr) => {
        $crate::FacetValue::CarClass($v)
    };
    (@value car, $v:expr) => {
        $crate::FacetValue::Car($v)
    };
    (@value track, $v:expr) => {
        $crate::FacetValue::Track($v)
    };
    ($($facet:ident : [ $($v:expr),* $(,)? ]),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut sel = $crate::Selection::new();
        $($( sel.insert($crate::selection!(@value $facet, $v)); )*)*
        sel
    }};
}
