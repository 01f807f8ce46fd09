//! Builds a [`SymbolTable`] from the browser's global object.
//!
//! Only bindings the extractor could use are converted: minified names,
//! arrays, and constructors whose minified prototype members are turned into
//! their source text. Everything else becomes [`Symbol::Object`].

use super::{
    classify::is_minified_name,
    symbols::{Symbol, SymbolEntry, SymbolTable},
};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Snapshot of the minified globals of the current page.
pub fn window_symbols() -> SymbolTable {
    let global = js_sys::global();
    let mut table = SymbolTable::new();

    for key in Object::keys(&global).iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        if !is_minified_name(&name) {
            continue;
        }
        // some window properties throw on access
        match Reflect::get(&global, &key) {
            Ok(value) => table.insert(name, convert(&value)),
            Err(err) => log::debug!("skipping global {}: {:?}", name, err),
        }
    }

    table
}

fn convert(value: &JsValue) -> Symbol {
    if value.is_null() || value.is_undefined() {
        return Symbol::Null;
    }
    if let Some(n) = value.as_f64() {
        return Symbol::Number(n);
    }
    if let Some(s) = value.as_string() {
        return Symbol::Text(s);
    }
    if Array::is_array(value) {
        let array: &Array = value.unchecked_ref();
        return Symbol::Array(array.iter().map(|item| shallow(&item)).collect());
    }
    if let Some(prototype) = prototype_of(value) {
        return Symbol::Constructor {
            prototype: prototype_members(&prototype),
        };
    }
    Symbol::Object
}

/// Array elements are never descended into.
fn shallow(value: &JsValue) -> Symbol {
    match value.as_f64() {
        Some(n) => Symbol::Number(n),
        None if value.is_null() || value.is_undefined() => Symbol::Null,
        None => Symbol::Object,
    }
}

fn prototype_of(value: &JsValue) -> Option<Object> {
    if !value.is_object() && !value.is_function() {
        return None;
    }
    Reflect::get(value, &JsValue::from_str("prototype"))
        .ok()
        .and_then(|prototype| prototype.dyn_into::<Object>().ok())
}

fn prototype_members(prototype: &Object) -> Vec<SymbolEntry> {
    Object::keys(prototype)
        .iter()
        .filter_map(|key| {
            let name = key.as_string().filter(|name| is_minified_name(name))?;
            let member = Reflect::get(prototype, &key).ok()?;
            let function = member.dyn_ref::<Function>()?;
            let source = String::from(function.to_string());
            Some(SymbolEntry::new(name, Symbol::function(source)))
        })
        .collect()
}
