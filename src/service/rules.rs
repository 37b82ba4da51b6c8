//! Field rules per request body.

use super::validation::{Format, Rules, ValidationRule as R};

const PHONE_PATTERN: &str = r"^\+?\d+$";
/// Stock is stored as a 32-bit integer.
const MAX_STOCK: i64 = i32::MAX as i64;
const STOCK_TOO_LARGE: &str = "Stock is too large";
const PASSWORD_STRENGTH: &str = "Password must include uppercase, lowercase, number and special character";

fn phone(required: &'static str) -> R {
    R::text()
        .required(required)
        .min_len(11, "Phone number must be at least 11 characters")
        .max_len(15, "Phone number must be at most 15 characters")
        .pattern(PHONE_PATTERN, "Phone number must contain only digits and optional leading +")
}

fn password(required: &'static str) -> R {
    R::text()
        .required(required)
        .min_len(8, "Password must be at least 8 characters")
        .format(Format::StrongPassword, PASSWORD_STRENGTH)
}

fn name_field(required: &'static str, max: usize, too_long: &'static str) -> R {
    R::text().required(required).min_len(1, required).max_len(max, too_long)
}

/// Store, contact and address fields shared by registration and profile update.
fn seller_profile_fields() -> Rules {
    vec![
        ("storeName", name_field("Store name is required", 100, "Store name must be at most 100 characters")),
        ("description", name_field("Description is required", 255, "Description must be at most 255 characters")),
        ("picName", name_field("PIC name is required", 100, "PIC name must be at most 100 characters")),
        ("picHp", phone("Phone number is required")),
        (
            "address",
            R::text()
                .required("Address is required")
                .min_len(5, "Address is too short")
                .max_len(255, "Address must be at most 255 characters"),
        ),
        ("picRT", R::integer().required("RT is required").min(1, "RT is required").max(999, "RT must be at most 999")),
        ("picRW", R::integer().required("RW is required").min(1, "RW is required").max(999, "RW must be at most 999")),
        ("picProvince", name_field("Province is required", 100, "Province must be at most 100 characters")),
        ("picCity", name_field("City is required", 100, "City must be at most 100 characters")),
        ("picDistrict", name_field("District is required", 100, "District must be at most 100 characters")),
        ("picVillage", name_field("Village is required", 100, "Village must be at most 100 characters")),
    ]
}

pub fn seller_registration() -> Rules {
    let mut rules = seller_profile_fields();
    rules.extend([
        (
            "picEmail",
            R::text()
                .required("Email is required")
                .format(Format::Email, "Invalid email address"),
        ),
        ("password", password("Password is required")),
        (
            "picNoKTP",
            R::text()
                .required("KTP is required")
                .min_len(16, "KTP must be exactly 16 digits")
                .max_len(16, "KTP must be exactly 16 digits")
                .pattern(r"^\d{16}$", "KTP must contain only digits"),
        ),
        ("picUrlKTP", R::text().required("Invalid KTP URL").min_len(1, "Invalid KTP URL")),
        ("picUrlPhoto", R::text().required("Invalid photo URL").min_len(1, "Invalid photo URL")),
    ]);
    rules
}

pub fn seller_profile() -> Rules {
    seller_profile_fields()
}

pub fn password_change() -> Rules {
    vec![
        (
            "currentPassword",
            R::text()
                .required("Current password is required")
                .min_len(1, "Current password is required"),
        ),
        ("newPassword", password("New password is required")),
        (
            "confirmPassword",
            R::text()
                .required("Please confirm your password")
                .min_len(1, "Please confirm your password"),
        ),
    ]
}

pub fn seller_login() -> Rules {
    vec![
        ("identifier", R::text().required("Email or phone number is required").min_len(1, "Email or phone number is required")),
        ("password", R::text().required("Password is required").min_len(1, "Password is required")),
    ]
}

pub fn admin_login() -> Rules {
    vec![
        ("username", R::text().required("Username is required").min_len(1, "Username is required")),
        ("password", R::text().required("Password is required").min_len(1, "Password is required")),
    ]
}

pub fn product_create() -> Rules {
    vec![
        ("name", R::text().required("Product name is required").min_len(1, "Product name is required").max_len(255, "Product name is too long")),
        (
            "categoryId",
            R::integer()
                .alias("category_id")
                .required("Category is required")
                .min(1, "Category is required"),
        ),
        ("stock", R::integer().required("Stock is required").min(1, "Stock is required").max(MAX_STOCK, STOCK_TOO_LARGE)),
        ("description", R::text().max_len(1000, "Description is too long")),
        ("price", R::integer().required("Price is required").min(1, "Price is required")),
        ("imageKeys", R::text_list().min_len(1, "Image key cannot be empty")),
    ]
}

/// Partial product update. Stock may drop to zero here; creation needs at least one unit.
pub fn product_update() -> Rules {
    vec![
        ("name", R::text().min_len(1, "Product name is required").max_len(255, "Product name is too long")),
        ("categoryId", R::integer().alias("category_id").min(1, "Category is required")),
        ("stock", R::integer().min(0, "Stock cannot be negative").max(MAX_STOCK, STOCK_TOO_LARGE)),
        ("description", R::text().max_len(1000, "Description is too long")),
        ("price", R::integer().min(1, "Price is required")),
        ("imageKeys", R::text_list().min_len(1, "Image key cannot be empty")),
        ("deleteImageKeys", R::text_list().min_len(1, "Image key cannot be empty")),
    ]
}

pub fn review() -> Rules {
    vec![
        ("name", name_field("Name is required", 100, "Name must be at most 100 characters")),
        ("noHp", phone("Phone number is required")),
        ("email", R::text().required("Email is required").format(Format::Email, "Invalid email address")),
        (
            "rating",
            R::integer()
                .required("Rating is required")
                .min(1, "Rating must be between 1 and 5")
                .max(5, "Rating must be between 1 and 5"),
        ),
        ("comment", R::text().max_len(1000, "Comment is too long")),
        ("province", name_field("Province is required", 100, "Province must be at most 100 characters")),
    ]
}

pub fn category_create() -> Rules {
    vec![
        ("name", name_field("Category name is required", 100, "Category name must be at most 100 characters")),
        ("description", R::text().max_len(255, "Description must be at most 255 characters")),
    ]
}

pub fn category_update() -> Rules {
    vec![
        ("name", R::text().min_len(1, "Category name is required").max_len(100, "Category name must be at most 100 characters")),
        ("description", R::text().max_len(255, "Description must be at most 255 characters")),
    ]
}
