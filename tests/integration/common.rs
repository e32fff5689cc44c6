//! Sites shared by the integration tests.

use pydocs_handler::objects::NodeSpec;
use pydocs_handler::test_utils::{DumpDir, fixtures};

/// `shop`: a module with a class hierarchy, a private helper and a
/// re-export of `vendor.tools.helper`.
pub fn shop_module() -> NodeSpec {
    use fixtures::{alias, attribute, class, function, function_with, module};

    module("shop")
        .with_docstring("Shop module.")
        .with_member(attribute("CURRENCY").with_lineno(1).with_docstring("Default currency."))
        .with_member(
            class("Item", &[])
                .with_lineno(3)
                .with_docstring("An item.")
                .with_member(function("price").with_lineno(4).with_docstring("Price of the item."))
                .with_member(function("_cache").with_lineno(5).with_docstring("Internal.")),
        )
        .with_member(
            class("Book", &["shop.Item"])
                .with_lineno(8)
                .with_docstring("A book.")
                .with_member(function("read").with_lineno(9).with_docstring("Read the book.")),
        )
        .with_member(
            function_with(
                "checkout",
                &[("cart", Some("list[Item]"), None)],
                Some("bool"),
            )
            .with_lineno(12)
            .with_docstring("Check out a cart."),
        )
        .with_member(alias("helper", "vendor.tools.helper").with_lineno(2))
}

pub fn vendor_module() -> NodeSpec {
    use fixtures::{function, module};

    let helper = function("helper").with_lineno(1).with_docstring("Vendor helper.");
    module("vendor").with_member(module("tools").with_member(helper))
}

/// A site with the `shop` and `vendor` dumps.
pub fn shop_site() -> DumpDir {
    let site = DumpDir::new().unwrap();
    site.write_module(&shop_module()).unwrap();
    site.write_module(&vendor_module()).unwrap();
    site
}
